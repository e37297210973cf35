//! DOM side of the event popover: anchor observers, geometry and the
//! popover element itself.

use std::rc::Rc;

use gloo::events::{
  EventListener,
  EventListenerOptions,
  EventListenerPhase
};
use kursplan_core::content::PopoverContent;
use kursplan_core::overlay::{
  Measurement,
  OverlayHost
};
use kursplan_core::position::{
  Position,
  Rect,
  Size
};
use kursplan_core::reactive::CancelHandle;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
  Element,
  HtmlElement,
  MutationObserver,
  MutationObserverInit,
  ResizeObserver
};
use yew::{
  Callback,
  NodeRef
};

/// Drops a JS callback on the next tick. Observers may cancel themselves
/// from inside their own callback, and the running closure must outlive
/// that call.
fn release_later<T: 'static>(value: T) {
  wasm_bindgen_futures::spawn_local(
    async move {
      drop(value);
    }
  );
}

/// The window's visible area in coordinates relative to `origin`.
fn viewport_in(origin: Rect) -> Rect {
  let dimension = |value: Result<
    JsValue,
    JsValue
  >| {
    value
      .ok()
      .and_then(|value| value.as_f64())
      .unwrap_or(f64::INFINITY)
  };
  let (width, height) =
    match web_sys::window() {
      | Some(window) => (
        dimension(window.inner_width()),
        dimension(window.inner_height())
      ),
      | None => {
        (f64::INFINITY, f64::INFINITY)
      }
    };
  Rect::new(
    -origin.x,
    -origin.y,
    width,
    height
  )
}

fn rect_of(element: &Element) -> Rect {
  let rect = element.get_bounding_client_rect();
  Rect::new(
    rect.left(),
    rect.top(),
    rect.width(),
    rect.height()
  )
}

#[derive(Clone)]
pub struct DomOverlayHost {
  popover:    NodeRef,
  on_content: Callback<Option<PopoverContent>>
}

impl DomOverlayHost {
  /// `popover` is the rendered popover element; `on_content` feeds the
  /// component that renders its text.
  pub fn new(
    popover: NodeRef,
    on_content: Callback<Option<PopoverContent>>
  ) -> Self {
    Self {
      popover,
      on_content
    }
  }

  fn popover_element(
    &self
  ) -> Option<HtmlElement> {
    self.popover.cast::<HtmlElement>()
  }
}

impl OverlayHost for DomOverlayHost {
  type Node = Element;

  fn is_attached(
    &self,
    anchor: &Element
  ) -> bool {
    anchor.is_connected()
  }

  fn observe_child_list(
    &self,
    container: &Element,
    on_mutation: Rc<dyn Fn()>
  ) -> CancelHandle {
    let callback = Closure::<
      dyn FnMut(JsValue, JsValue)
    >::new(
      move |_records: JsValue, _observer: JsValue| {
        on_mutation();
      }
    );

    let observer =
      match MutationObserver::new(
        callback.as_ref().unchecked_ref()
      ) {
        | Ok(observer) => observer,
        | Err(error) => {
          tracing::warn!(error = ?error, "MutationObserver unavailable; popover will not follow anchor removal");
          return CancelHandle::noop();
        }
      };

    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    if let Err(error) = observer
      .observe_with_options(container, &init)
    {
      tracing::warn!(error = ?error, "failed observing popover container");
      return CancelHandle::noop();
    }

    CancelHandle::new(move || {
      observer.disconnect();
      release_later(callback);
    })
  }

  fn watch_geometry(
    &self,
    anchor: &Element,
    on_change: Rc<dyn Fn()>
  ) -> CancelHandle {
    let Some(window) = web_sys::window()
    else {
      return CancelHandle::noop();
    };

    let scroll = {
      let on_change = Rc::clone(&on_change);
      EventListener::new_with_options(
        &window,
        "scroll",
        EventListenerOptions {
          phase:   EventListenerPhase::Capture,
          passive: true
        },
        move |_| on_change()
      )
    };
    let resize = {
      let on_change = Rc::clone(&on_change);
      EventListener::new(
        &window,
        "resize",
        move |_| on_change()
      )
    };

    let callback = Closure::<
      dyn FnMut(JsValue, JsValue)
    >::new(
      move |_entries: JsValue, _observer: JsValue| {
        on_change();
      }
    );
    let resize_observer = ResizeObserver::new(
      callback.as_ref().unchecked_ref()
    )
    .inspect_err(|error| {
      tracing::warn!(error = ?error, "ResizeObserver unavailable; popover follows scroll and resize only");
    })
    .ok();
    if let Some(observer) = &resize_observer {
      observer.observe(anchor);
      if let Some(popover) =
        self.popover_element()
      {
        observer.observe(&popover);
      }
    }

    CancelHandle::new(move || {
      drop(scroll);
      drop(resize);
      if let Some(observer) = resize_observer
      {
        observer.disconnect();
      }
      release_later(callback);
    })
  }

  fn measure(
    &self,
    anchor: &Element
  ) -> Option<Measurement> {
    let popover = self.popover_element()?;
    let container =
      popover.offset_parent()?;
    let origin = rect_of(&container);
    let anchor = rect_of(anchor);

    Some(Measurement {
      anchor:   Rect::new(
        anchor.x - origin.x,
        anchor.y - origin.y,
        anchor.width,
        anchor.height
      ),
      floating: Size {
        width:  f64::from(
          popover.offset_width()
        ),
        height: f64::from(
          popover.offset_height()
        )
      },
      boundary: Rect::new(
        0.0,
        0.0,
        origin.width,
        origin.height
      )
      .intersection(&viewport_in(origin))
    })
  }

  fn show(&self, content: &PopoverContent) {
    self.on_content.emit(Some(content.clone()));
  }

  fn hide(&self) {
    self.on_content.emit(None);
  }

  fn place(&self, position: Position) {
    let Some(popover) = self.popover_element()
    else {
      return;
    };
    let style = popover.style();
    let _ = style.set_property(
      "left",
      &format!("{}px", position.x)
    );
    let _ = style.set_property(
      "top",
      &format!("{}px", position.y)
    );
  }
}
