//! Bindings for the FullCalendar global bundle (`window.FullCalendar`).

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
  #[wasm_bindgen(js_namespace = FullCalendar)]
  pub type Calendar;

  #[wasm_bindgen(catch, constructor, js_namespace = FullCalendar)]
  pub fn new(
    element: &web_sys::Element,
    options: &JsValue
  ) -> Result<Calendar, JsValue>;

  #[wasm_bindgen(method)]
  pub fn render(this: &Calendar);

  #[wasm_bindgen(method, js_name = removeAllEventSources)]
  pub fn remove_all_event_sources(this: &Calendar);

  #[wasm_bindgen(method, js_name = addEventSource)]
  pub fn add_event_source(
    this: &Calendar,
    source: &JsValue
  );

  #[wasm_bindgen(method, js_name = changeView)]
  pub fn change_view(
    this: &Calendar,
    view: &str
  );

  #[wasm_bindgen(method, js_name = refetchEvents)]
  pub fn refetch_events(this: &Calendar);

  #[wasm_bindgen(method)]
  pub fn prev(this: &Calendar);

  #[wasm_bindgen(method)]
  pub fn next(this: &Calendar);

  #[wasm_bindgen(method)]
  pub fn today(this: &Calendar);

  #[wasm_bindgen(method, getter)]
  pub fn view(this: &Calendar) -> ViewApi;
}

#[wasm_bindgen]
extern "C" {
  pub type ViewApi;

  #[wasm_bindgen(method, getter, js_name = type)]
  pub fn view_type(this: &ViewApi) -> String;

  #[wasm_bindgen(method, getter)]
  pub fn title(this: &ViewApi) -> String;
}
