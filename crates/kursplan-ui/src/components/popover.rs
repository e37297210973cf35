use kursplan_core::content::PopoverContent;
use yew::{
  Callback,
  Html,
  NodeRef,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct PopoverProps {
  pub node_ref: NodeRef,
  pub content:  Option<PopoverContent>,
  pub on_close: Callback<()>
}

/// Always rendered so the overlay host can measure and place it; hidden
/// while no session is open.
#[function_component(Popover)]
pub fn popover(
  props: &PopoverProps
) -> Html {
  let on_close = {
    let on_close = props.on_close.clone();
    Callback::from(move |_: web_sys::MouseEvent| {
      on_close.emit(())
    })
  };
  let content = props
    .content
    .clone()
    .unwrap_or_default();
  let class = if props.content.is_some() {
    "popover"
  } else {
    "popover hidden"
  };

  html! {
      <div class={class} ref={props.node_ref.clone()} role="dialog">
          <div class="popover-head">
              <span class="popover-title">{ content.title }</span>
              <button class="icon-button" aria-label="Schließen" onclick={on_close}>{ "✕" }</button>
          </div>
          <div>{ content.description }</div>
          <div class="popover-details">
              <div>{ content.rooms }</div>
              <div>{ content.kind }</div>
              <div>{ content.time }</div>
          </div>
      </div>
  }
}
