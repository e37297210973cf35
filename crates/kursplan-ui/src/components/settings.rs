use kursplan_core::selection::GroupOption;
use kursplan_core::view::ViewId;
use kursplan_shared::Subject;
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct SettingsProps {
  pub subjects:       Vec<Subject>,
  pub active_subject: Option<String>,
  pub groups:         Vec<GroupOption>,
  pub view:           ViewId,
  pub on_subject:     Callback<String>,
  pub on_group:       Callback<String>,
  pub on_view:        Callback<ViewId>
}

#[function_component(Settings)]
pub fn settings(
  props: &SettingsProps
) -> Html {
  let on_subject = {
    let on_subject = props.on_subject.clone();
    Callback::from(move |e: web_sys::Event| {
      let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
      on_subject.emit(select.value());
    })
  };
  let on_group = {
    let on_group = props.on_group.clone();
    Callback::from(move |e: web_sys::Event| {
      let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
      on_group.emit(select.value());
    })
  };

  let view_button = |view: ViewId| {
    let on_view = props.on_view.clone();
    let class = if props.view == view {
      "active"
    } else {
      ""
    };
    html! {
        <button class={class} onclick={move |_| on_view.emit(view)}>
            { view.label() }
        </button>
    }
  };

  html! {
      <>
          <div class="settings">
              <select name="subject" onchange={on_subject}>
                  if props.active_subject.is_none() {
                      <option value="" selected=true disabled=true>{ "Studiengang wählen" }</option>
                  }
                  { for props.subjects.iter().map(|subject| html! {
                      <option
                          value={subject.id.clone()}
                          selected={props.active_subject.as_deref() == Some(subject.id.as_str())}
                      >
                          { subject.name.clone() }
                      </option>
                  }) }
              </select>
              <select name="group" onchange={on_group}>
                  { for props.groups.iter().map(|group| html! {
                      <option value={group.id.clone()} selected={group.selected}>
                          { group.id.clone() }
                      </option>
                  }) }
              </select>
          </div>
          <nav class="views">
              { for ViewId::all().into_iter().map(view_button) }
          </nav>
      </>
  }
}
