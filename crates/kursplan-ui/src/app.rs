use std::rc::Rc;

use gloo::console::log;
use gloo::events::EventListener;
use kursplan_core::binding::Navigation;
use kursplan_core::config::AppConfig;
use kursplan_core::content::{
  EventRecord,
  PopoverContent
};
use kursplan_core::reactive::Reaction;
use kursplan_core::runtime::Runtime;
use kursplan_core::view::ViewId;
use web_sys::Element;
use yew::{
  Callback,
  Html,
  function_component,
  html,
  use_effect_with,
  use_force_update,
  use_memo,
  use_node_ref,
  use_state
};

use crate::api::fetch_catalog;
use crate::components::{
  CalendarHeader,
  Popover,
  Settings
};
use crate::overlay::DomOverlayHost;
use crate::storage::{
  BrowserQuery,
  BrowserStorage
};
use crate::widget::{
  CalendarHandlers,
  FullCalendarWidget
};

const APP_CONFIG_TOML: &str =
  include_str!("../assets/kursplan.toml");

type AppRuntime =
  Runtime<FullCalendarWidget, DomOverlayHost>;

#[derive(Clone, PartialEq)]
enum Bootstrap {
  Loading,
  Ready,
  Failed(String)
}

/// The runtime plus the reaction that re-renders the app on state changes.
struct Shell {
  runtime:   Rc<AppRuntime>,
  _rerender: Reaction
}

fn load_app_config() -> AppConfig {
  AppConfig::load_or_default(
    APP_CONFIG_TOML
  )
}

fn viewport_width() -> Option<f64> {
  web_sys::window()?
    .inner_width()
    .ok()?
    .as_f64()
}

fn ui_debug(
  event: &str,
  detail: &str
) {
  tracing::debug!(
    event, detail, "ui-debug"
  );
  log!(format!(
    "[ui-debug] {event}: {detail}"
  ));
}

#[function_component(App)]
pub fn app() -> Html {
  let popover_ref = use_node_ref();
  let calendar_ref = use_node_ref();
  let popover_content =
    use_state(|| None::<PopoverContent>);
  let bootstrap =
    use_state(|| Bootstrap::Loading);
  let force_update = use_force_update();

  let shell = {
    let popover_ref = popover_ref.clone();
    let set_content =
      popover_content.setter();
    use_memo((), move |_| {
      let host = DomOverlayHost::new(
        popover_ref,
        Callback::from(move |content| {
          set_content.set(content)
        })
      );
      let runtime = Rc::new(Runtime::new(
        load_app_config(),
        Rc::new(BrowserQuery),
        Rc::new(BrowserStorage),
        host
      ));

      let rerender = runtime
        .store()
        .reaction(move || {
          force_update.force_update()
        });
      rerender
        .track(
          runtime
            .selection()
            .group_param()
            .signal()
        )
        .track(
          runtime.selection().catalog_signal()
        )
        .track(runtime.view().signal())
        .track(runtime.binding().title())
        .track(runtime.sidebar().signal());

      Shell {
        runtime,
        _rerender: rerender
      }
    })
  };
  let runtime = Rc::clone(&shell.runtime);

  {
    let runtime = Rc::clone(&runtime);
    let bootstrap = bootstrap.clone();
    use_effect_with((), move |_| {
      let site = runtime.config().site.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          let catalog =
            fetch_catalog(&site).await;
          match runtime.bootstrap(catalog) {
            | Ok(()) => {
              bootstrap.set(Bootstrap::Ready)
            }
            | Err(error) => {
              bootstrap.set(Bootstrap::Failed(
                error.to_string()
              ))
            }
          }
        }
      );
      || ()
    });
  }

  {
    let runtime = Rc::clone(&runtime);
    let calendar_ref = calendar_ref.clone();
    use_effect_with((), move |_| {
      match calendar_ref.cast::<Element>() {
        | Some(root) => {
          let weak = Rc::downgrade(&runtime);
          let on_event_click = {
            let weak = weak.clone();
            let fallback = root.clone();
            move |anchor: Element,
                  event: EventRecord| {
              if let Some(runtime) =
                weak.upgrade()
              {
                runtime.open_event(
                  anchor, &fallback, &event
                );
              }
            }
          };
          let on_events_set = move || {
            if let Some(runtime) = weak.upgrade()
            {
              runtime.binding().on_events_set();
            }
          };

          match FullCalendarWidget::create(
            &root,
            runtime.config(),
            runtime.view().get(),
            CalendarHandlers {
              on_event_click: Box::new(
                on_event_click
              ),
              on_events_set:  Box::new(
                on_events_set
              )
            }
          ) {
            | Ok(widget) => {
              runtime.binding().mount(widget);
              ui_debug(
                "calendar.mounted",
                "widget handed to binding"
              );
            }
            | Err(error) => {
              tracing::error!(error = %format!("{error:#}"), "calendar widget failed to start");
            }
          }
        }
        | None => {
          tracing::error!("calendar container missing after render");
        }
      }

      move || {
        runtime.overlay().close();
        drop(runtime.binding().unmount());
      }
    });
  }

  {
    let runtime = Rc::clone(&runtime);
    use_effect_with((), move |_| {
      if let Some(width) = viewport_width() {
        runtime
          .sidebar()
          .observe_viewport(width);
      }
      let listener =
        web_sys::window().map(|window| {
          EventListener::new(
            &window,
            "resize",
            move |_| {
              if let Some(width) =
                viewport_width()
              {
                runtime
                  .sidebar()
                  .observe_viewport(width);
              }
            }
          )
        });
      move || drop(listener)
    });
  }

  let on_menu = {
    let runtime = Rc::clone(&runtime);
    Callback::from(move |()| {
      runtime.sidebar().toggle()
    })
  };
  let on_backdrop = {
    let runtime = Rc::clone(&runtime);
    Callback::from(
      move |_: web_sys::MouseEvent| {
        runtime.sidebar().toggle()
      }
    )
  };
  let on_navigate = {
    let runtime = Rc::clone(&runtime);
    Callback::from(
      move |navigation: Navigation| {
        runtime.navigate(navigation)
      }
    )
  };
  let on_subject = {
    let runtime = Rc::clone(&runtime);
    Callback::from(move |id: String| {
      runtime.select_subject(&id);
    })
  };
  let on_group = {
    let runtime = Rc::clone(&runtime);
    Callback::from(move |id: String| {
      runtime.select_group(&id)
    })
  };
  let on_view = {
    let runtime = Rc::clone(&runtime);
    Callback::from(move |view: ViewId| {
      runtime.store().batch(|| {
        runtime.sidebar().hide();
        runtime.set_view(view);
      })
    })
  };
  let on_close = {
    let runtime = Rc::clone(&runtime);
    Callback::from(move |()| {
      runtime.overlay().close();
    })
  };

  if let Bootstrap::Failed(message) =
    &*bootstrap
  {
    return html! {
        <div class="fatal" role="alert">
            <h1>{ "Stundenplan nicht verfügbar" }</h1>
            <p>{ "Die Studiengänge konnten nicht geladen werden." }</p>
            <pre>{ message.clone() }</pre>
        </div>
    };
  }

  let selection = runtime.selection();
  let sidebar = runtime.sidebar();

  html! {
      <div class="layout">
          <aside class={sidebar.class()}>
              if *bootstrap == Bootstrap::Ready {
                  <Settings
                      subjects={selection.subjects()}
                      active_subject={selection.active_subject().map(|subject| subject.id)}
                      groups={selection.groups_for_active_subject()}
                      view={runtime.view().get()}
                      on_subject={on_subject}
                      on_group={on_group}
                      on_view={on_view}
                  />
              } else {
                  <p class="settings">{ "Lade Studiengänge …" }</p>
              }
          </aside>
          <div class="main">
              <div class={sidebar.backdrop_class()} onclick={on_backdrop}></div>
              <CalendarHeader
                  title={runtime.binding().title().get()}
                  on_menu={on_menu}
                  on_navigate={on_navigate}
              />
              <div class="calendar" ref={calendar_ref}></div>
              <Popover
                  node_ref={popover_ref}
                  content={(*popover_content).clone()}
                  on_close={on_close}
              />
          </div>
      </div>
  }
}
