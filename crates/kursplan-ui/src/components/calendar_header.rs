use kursplan_core::binding::Navigation;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct CalendarHeaderProps {
  pub title:       String,
  pub on_menu:     Callback<()>,
  pub on_navigate: Callback<Navigation>
}

fn today_number() -> u32 {
  js_sys::Date::new_0().get_date()
}

#[function_component(CalendarHeader)]
pub fn calendar_header(
  props: &CalendarHeaderProps
) -> Html {
  let nav = |navigation: Navigation| {
    let on_navigate =
      props.on_navigate.clone();
    Callback::from(
      move |_: web_sys::MouseEvent| {
        on_navigate.emit(navigation)
      }
    )
  };
  let on_menu = {
    let on_menu = props.on_menu.clone();
    Callback::from(move |_: web_sys::MouseEvent| {
      on_menu.emit(())
    })
  };

  html! {
      <nav class="calendar-header">
          <button class="icon-button menu-button" aria-label="Menü" onclick={on_menu}>
              { "☰" }
          </button>
          <span class="title">{ props.title.clone() }</span>
          <div>
              <button class="icon-button" aria-label="Heute" onclick={nav(Navigation::Today)}>
                  { today_number().to_string() }
              </button>
              <button class="icon-button" aria-label="Zurück" onclick={nav(Navigation::Prev)}>
                  { "‹" }
              </button>
              <button class="icon-button" aria-label="Weiter" onclick={nav(Navigation::Next)}>
                  { "›" }
              </button>
          </div>
      </nav>
  }
}
