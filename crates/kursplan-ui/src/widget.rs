//! [`CalendarWidget`] over a live FullCalendar instance.

use std::rc::Rc;

use anyhow::anyhow;
use js_sys::{
  Array,
  Object,
  Reflect
};
use kursplan_core::api::EventSource;
use kursplan_core::binding::CalendarWidget;
use kursplan_core::config::AppConfig;
use kursplan_core::content::{
  EventRecord,
  cell_lines,
  parse_event_time
};
use kursplan_core::view::ViewId;
use kursplan_shared::EventExtras;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::fullcalendar::Calendar;

fn set_prop(
  target: &Object,
  key: &str,
  value: &JsValue
) -> anyhow::Result<()> {
  Reflect::set(
    target,
    &JsValue::from_str(key),
    value
  )
  .map(|_| ())
  .map_err(|error| {
    anyhow!(
      "failed setting `{key}`: {error:?}"
    )
  })
}

fn get_prop(
  target: &JsValue,
  key: &str
) -> JsValue {
  Reflect::get(
    target,
    &JsValue::from_str(key)
  )
  .unwrap_or(JsValue::UNDEFINED)
}

fn get_string(
  target: &JsValue,
  key: &str
) -> String {
  get_prop(target, key)
    .as_string()
    .unwrap_or_default()
}

/// Reads the fields the popover and cells need from an `EventApi`.
pub fn event_record(
  event: &JsValue
) -> EventRecord {
  let props =
    get_prop(event, "extendedProps");
  let extras = if props.is_object() {
    serde_wasm_bindgen::from_value::<
      EventExtras
    >(props)
    .unwrap_or_else(|error| {
      tracing::warn!(%error, "unreadable event extension fields");
      EventExtras::default()
    })
  } else {
    EventExtras::default()
  };

  EventRecord {
    title: get_string(event, "title"),
    start: parse_event_time(&get_string(
      event, "startStr"
    )),
    end: parse_event_time(&get_string(
      event, "endStr"
    )),
    extras
  }
}

fn cell_content(
  title: &str,
  notes: &str
) -> Option<JsValue> {
  let document =
    web_sys::window()?.document()?;
  let cell =
    document.create_element("div").ok()?;
  cell.set_class_name("cell");
  for (class, text) in [
    ("cell-title", title),
    ("cell-notes", notes)
  ] {
    let line = document
      .create_element("div")
      .ok()?;
    line.set_class_name(class);
    line.set_text_content(Some(text));
    cell.append_child(&line).ok()?;
  }

  let content = Object::new();
  set_prop(
    &content,
    "domNodes",
    &Array::of1(&cell)
  )
  .ok()?;
  Some(content.into())
}

/// Callbacks the widget forwards its interaction hooks to.
pub struct CalendarHandlers {
  pub on_event_click:
    Box<dyn Fn(Element, EventRecord)>,
  pub on_events_set: Box<dyn Fn()>
}

struct Closures {
  _event_click:   Closure<dyn FnMut(JsValue)>,
  _events_set:    Closure<dyn FnMut(JsValue)>,
  _event_content:
    Closure<dyn FnMut(JsValue) -> JsValue>
}

#[derive(Clone)]
pub struct FullCalendarWidget {
  calendar:  Rc<Calendar>,
  root:      Element,
  _closures: Rc<Closures>
}

impl FullCalendarWidget {
  /// Renders a calendar into `root` with the built-in header toolbar
  /// disabled; navigation goes through the app header.
  pub fn create(
    root: &Element,
    config: &AppConfig,
    initial_view: ViewId,
    handlers: CalendarHandlers
  ) -> anyhow::Result<Self> {
    let CalendarHandlers {
      on_event_click,
      on_events_set
    } = handlers;

    let event_click = Closure::<
      dyn FnMut(JsValue)
    >::new(
      move |info: JsValue| {
        let anchor =
          get_prop(&info, "el")
            .dyn_into::<Element>()
            .ok();
        let event =
          get_prop(&info, "event");
        match anchor {
          | Some(anchor) => {
            on_event_click(
              anchor,
              event_record(&event)
            );
          }
          | None => {
            tracing::warn!("event click without an element");
          }
        }
      }
    );

    let events_set = Closure::<
      dyn FnMut(JsValue)
    >::new(move |_events: JsValue| {
      on_events_set();
    });

    let event_content = Closure::<
      dyn FnMut(JsValue) -> JsValue
    >::new(
      move |arg: JsValue| {
        let view_name = get_string(
          &get_prop(&arg, "view"),
          "type"
        );
        let record = event_record(
          &get_prop(&arg, "event")
        );
        ViewId::from_widget_name(&view_name)
          .and_then(|view| {
            cell_lines(view, &record)
          })
          .and_then(|(title, notes)| {
            cell_content(&title, &notes)
          })
          .unwrap_or(JsValue::TRUE)
      }
    );

    let options = Object::new();
    set_prop(&options, "height", &"100%".into())?;
    set_prop(
      &options,
      "locale",
      &config.locale.as_str().into()
    )?;
    set_prop(&options, "timeZone", &"local".into())?;
    set_prop(
      &options,
      "initialView",
      &initial_view.widget_name().into()
    )?;
    set_prop(
      &options,
      "headerToolbar",
      &JsValue::FALSE
    )?;
    set_prop(
      &options,
      "eventClick",
      event_click.as_ref()
    )?;
    set_prop(
      &options,
      "eventsSet",
      events_set.as_ref()
    )?;
    set_prop(
      &options,
      "eventContent",
      event_content.as_ref()
    )?;

    let calendar =
      Calendar::new(root, &options)
        .map_err(|error| {
          anyhow!(
            "FullCalendar failed to initialise: {error:?}"
          )
        })?;
    calendar.render();
    tracing::info!(view = %initial_view, "calendar rendered");

    Ok(Self {
      calendar:  Rc::new(calendar),
      root:      root.clone(),
      _closures: Rc::new(Closures {
        _event_click:   event_click,
        _events_set:    events_set,
        _event_content: event_content
      })
    })
  }

  fn source_object(
    source: &EventSource
  ) -> anyhow::Result<Object> {
    let extra_params = Object::new();
    for param in &source.extra_params {
      set_prop(
        &extra_params,
        param,
        &JsValue::from_str("")
      )?;
    }

    let object = Object::new();
    set_prop(
      &object,
      "url",
      &source.url.as_str().into()
    )?;
    set_prop(
      &object,
      "extraParams",
      &extra_params
    )?;
    Ok(object)
  }
}

impl CalendarWidget for FullCalendarWidget {
  type Element = Element;

  fn remove_all_event_sources(&self) {
    self.calendar.remove_all_event_sources();
  }

  fn add_event_source(
    &self,
    source: &EventSource
  ) {
    match Self::source_object(source) {
      | Ok(object) => {
        self.calendar.add_event_source(&object)
      }
      | Err(error) => {
        tracing::error!(error = %format!("{error:#}"), url = %source.url, "failed building event source");
      }
    }
  }

  fn current_view(&self) -> String {
    self.calendar.view().view_type()
  }

  fn change_view(&self, view: &str) {
    self.calendar.change_view(view);
  }

  fn refetch_events(&self) {
    self.calendar.refetch_events();
  }

  fn view_title(&self) -> String {
    self.calendar.view().title()
  }

  fn prev(&self) {
    self.calendar.prev();
  }

  fn next(&self) {
    self.calendar.next();
  }

  fn today(&self) {
    self.calendar.today();
  }

  fn view_element(&self) -> Option<Element> {
    self
      .root
      .query_selector(".fc-view")
      .ok()
      .flatten()
  }
}
