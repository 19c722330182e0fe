//! JavaScript-facing handle over a browser session.
use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::dom;
use crate::game::{GUESS_COOLDOWN_MS, GameMode, GuessOutcome, WebSession, create_web_session};

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    let message = err.to_string();
    dom::console_error(&message);
    JsValue::from_str(&message)
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(to_js_error)
}

#[wasm_bindgen]
pub struct PtndleGame {
    session: Rc<RefCell<WebSession>>,
}

#[wasm_bindgen]
impl PtndleGame {
    /// Open the saved session and load the most recently played mode.
    ///
    /// # Errors
    /// Returns an error if `localStorage` is unavailable or the saved game cannot be loaded.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<PtndleGame, JsValue> {
        let mut session = create_web_session().map_err(to_js_error)?;
        session.update_based_on_save().map_err(to_js_error)?;
        Ok(Self {
            session: Rc::new(RefCell::new(session)),
        })
    }

    /// Current view of the active mode, or `undefined` before the first load.
    ///
    /// # Errors
    /// Returns an error if the view cannot be converted for JavaScript.
    pub fn view(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.borrow().view())
    }

    /// Win/loss headline and guess counter.
    ///
    /// # Errors
    /// Returns an error if the status cannot be converted for JavaScript.
    pub fn status(&self) -> Result<JsValue, JsValue> {
        let session = self.session.borrow();
        to_js(&session.view().map(|view| view.status()))
    }

    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> String {
        self.session.borrow().mode().to_string()
    }

    #[wasm_bindgen(getter, js_name = guessDisabled)]
    pub fn guess_disabled(&self) -> bool {
        self.session.borrow().is_guess_disabled()
    }

    /// Submit a guess by name. Accepted guesses lock input until the cooldown expires.
    ///
    /// # Errors
    /// Returns an error for unknown names or when the game cannot be saved.
    #[wasm_bindgen(js_name = submitGuess)]
    pub fn submit_guess(&self, name: &str) -> Result<JsValue, JsValue> {
        let outcome = self
            .session
            .borrow_mut()
            .submit_guess(name)
            .map_err(to_js_error)?;
        if outcome == GuessOutcome::Accepted {
            let session = Rc::clone(&self.session);
            let delay = i32::try_from(GUESS_COOLDOWN_MS).unwrap_or(i32::MAX);
            let scheduled = dom::set_timeout(delay, move || {
                session.borrow_mut().release_cooldown();
            });
            if let Err(err) = scheduled {
                // without a timer the input would stay locked
                log::warn!("cooldown timer failed: {}", dom::js_error_message(&err));
                self.session.borrow_mut().release_cooldown();
            }
        }
        to_js(&outcome)
    }

    /// Switch between daily and endless play.
    ///
    /// # Errors
    /// Returns an error if the newly active game cannot be loaded.
    #[wasm_bindgen(js_name = toggleEndlessMode)]
    pub fn toggle_endless_mode(&self) -> Result<JsValue, JsValue> {
        let mut session = self.session.borrow_mut();
        let view = session.toggle_endless_mode().map_err(to_js_error)?;
        to_js(view)
    }

    /// Select a mode by name (`daily` or `endless`).
    ///
    /// # Errors
    /// Returns an error for unknown mode names or if the game cannot be loaded.
    #[wasm_bindgen(js_name = setMode)]
    pub fn set_mode(&self, mode: &str) -> Result<JsValue, JsValue> {
        let mode: GameMode = mode
            .parse()
            .map_err(|()| to_js_error(format!("Unknown mode: {mode}")))?;
        let mut session = self.session.borrow_mut();
        let view = session.set_mode(mode).map_err(to_js_error)?;
        to_js(view)
    }

    /// Start the next endless puzzle. Returns `false` outside endless mode.
    ///
    /// # Errors
    /// Returns an error if the reset cannot be saved.
    #[wasm_bindgen(js_name = resetEndless)]
    pub fn reset_endless(&self) -> Result<bool, JsValue> {
        self.session
            .borrow_mut()
            .reset_endless()
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = shareText)]
    pub fn share_text(&self) -> Option<String> {
        self.session.borrow().share_text()
    }
}
