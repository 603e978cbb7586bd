use crate::config::{Color, KeyBindings, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::entity::Rect;
use crate::game::Game;
use crate::renderer::{CanvasSize, Input, Renderer, Surface};
use crate::scene;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::f64::consts::PI;
use std::io;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent};

const FONT_FAMILY: &str = "Arial";

pub struct WebRenderer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    window: web_sys::Window,
    device_pixel_ratio: f64,
    bindings: KeyBindings,

    // Input state, filled by DOM listeners and drained by the frame loop
    pending_input: Rc<RefCell<VecDeque<Input>>>,
}

impl WebRenderer {
    pub fn new(canvas_id: &str) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        // Get device pixel ratio for high DPI displays
        let device_pixel_ratio = window.device_pixel_ratio();

        Ok(Self {
            canvas,
            context,
            window,
            device_pixel_ratio,
            bindings: KeyBindings::default(),
            pending_input: Rc::new(RefCell::new(VecDeque::new())),
        })
    }

    fn setup_keyboard_listeners(&self) -> Result<(), JsValue> {
        for (event_name, pressed) in [("keydown", true), ("keyup", false)] {
            let pending_input = self.pending_input.clone();
            let bindings = self.bindings.clone();

            let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
                let key = event.key().to_lowercase();
                // Keep arrow keys from scrolling the page
                if bindings.is_bound(&key) {
                    event.prevent_default();
                }
                let input = if pressed {
                    Input::KeyDown(key)
                } else {
                    Input::KeyUp(key)
                };
                pending_input.borrow_mut().push_back(input);
            }) as Box<dyn FnMut(KeyboardEvent)>);

            self.window
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
            closure.forget(); // Keep listener alive
        }

        let pending_input = self.pending_input.clone();
        let blur_closure = Closure::wrap(Box::new(move || {
            pending_input.borrow_mut().push_back(Input::FocusLost);
        }) as Box<dyn FnMut()>);
        self.window
            .add_event_listener_with_callback("blur", blur_closure.as_ref().unchecked_ref())?;
        blur_closure.forget();

        Ok(())
    }

    fn setup_mouse_listeners(&self) -> Result<(), JsValue> {
        let pending_input = self.pending_input.clone();
        let canvas = self.canvas.clone();
        let move_closure = Closure::wrap(Box::new(move |event: MouseEvent| {
            let (x, y) = surface_coords(&canvas, &event);
            pending_input
                .borrow_mut()
                .push_back(Input::PointerMove { x, y });
        }) as Box<dyn FnMut(MouseEvent)>);

        self.canvas
            .add_event_listener_with_callback("mousemove", move_closure.as_ref().unchecked_ref())?;
        move_closure.forget();

        let pending_input = self.pending_input.clone();
        let canvas = self.canvas.clone();
        let click_closure = Closure::wrap(Box::new(move |event: MouseEvent| {
            let (x, y) = surface_coords(&canvas, &event);
            pending_input.borrow_mut().push_back(Input::Click { x, y });
        }) as Box<dyn FnMut(MouseEvent)>);

        self.canvas
            .add_event_listener_with_callback("click", click_closure.as_ref().unchecked_ref())?;
        click_closure.forget();

        Ok(())
    }

    fn resize_canvas(&self) -> Result<(), JsValue> {
        let size = CanvasSize::for_device_pixel_ratio(self.device_pixel_ratio);

        if self.canvas.width() != size.pixel_width || self.canvas.height() != size.pixel_height {
            // Internal resolution (actual pixels, scaled for high DPI)
            self.canvas.set_width(size.pixel_width);
            self.canvas.set_height(size.pixel_height);

            // Set CSS display size
            let style = self.canvas.style();
            style.set_property("width", &size.css_width)?;
            style.set_property("height", &size.css_height)?;

            // Setting width/height resets the context transform
            self.context.scale(size.scale, size.scale)?;
        }
        Ok(())
    }
}

/// Client coordinates to surface pixels, undoing any CSS scaling of the canvas
fn surface_coords(canvas: &HtmlCanvasElement, event: &MouseEvent) -> (f64, f64) {
    let bounds = canvas.get_bounding_client_rect();
    let scale_x = if bounds.width() > 0.0 {
        SCREEN_WIDTH / bounds.width()
    } else {
        1.0
    };
    let scale_y = if bounds.height() > 0.0 {
        SCREEN_HEIGHT / bounds.height()
    } else {
        1.0
    };
    (
        (event.client_x() as f64 - bounds.left()) * scale_x,
        (event.client_y() as f64 - bounds.top()) * scale_y,
    )
}

impl Surface for WebRenderer {
    fn clear(&mut self, color: Color) {
        self.context.set_fill_style_str(&color.to_css());
        self.context.fill_rect(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.context.set_fill_style_str(&color.to_css());
        self.context.fill_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        self.context.set_stroke_style_str(&color.to_css());
        self.context.stroke_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn dashed_vline(&mut self, x: f64, y0: f64, y1: f64, dash: f64, gap: f64, color: Color) {
        let pattern = js_array(&[dash, gap]);
        if let Err(e) = self.context.set_line_dash(&pattern) {
            log::warn!("Failed to set line dash: {:?}", e);
        }
        self.context.set_stroke_style_str(&color.to_css());
        self.context.begin_path();
        self.context.move_to(x, y0);
        self.context.line_to(x, y1);
        self.context.stroke();
        if let Err(e) = self.context.set_line_dash(&js_array(&[])) {
            log::warn!("Failed to reset line dash: {:?}", e);
        }
    }

    fn text_centered(&mut self, text: &str, x: f64, y: f64, size_px: f64, color: Color) {
        self.context.set_fill_style_str(&color.to_css());
        self.context.set_font(&format!("{}px {}", size_px, FONT_FAMILY));
        self.context.set_text_align("center");
        self.context.set_text_baseline("alphabetic");
        if let Err(e) = self.context.fill_text(text, x, y) {
            log::warn!("Failed to draw text {:?}: {:?}", text, e);
        }
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color, alpha: f64) {
        self.context.set_global_alpha(alpha);
        self.context.set_fill_style_str(&color.to_css());
        self.context.begin_path();
        if let Err(e) = self.context.arc(x, y, radius.max(0.0), 0.0, PI * 2.0) {
            log::warn!("Failed to draw particle: {:?}", e);
        }
        self.context.fill();
        self.context.set_global_alpha(1.0);
    }
}

fn js_array(values: &[f64]) -> JsValue {
    values
        .iter()
        .map(|v| JsValue::from_f64(*v))
        .collect::<js_sys::Array>()
        .into()
}

impl Renderer for WebRenderer {
    fn init(&mut self) -> io::Result<()> {
        let to_io = |e: JsValue| io::Error::new(io::ErrorKind::Other, format!("{:?}", e));

        self.setup_keyboard_listeners().map_err(to_io)?;
        self.setup_mouse_listeners().map_err(to_io)?;
        self.resize_canvas().map_err(to_io)?;

        Ok(())
    }

    fn render(&mut self, game: &Game) -> io::Result<()> {
        scene::draw(game, self);
        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        // No cleanup needed for web
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Option<Input>> {
        Ok(self.pending_input.borrow_mut().pop_front())
    }
}
