//! Side effects of menu interaction.
//!
//! Navigation, audio feedback and the HTML description overlay only exist in
//! the browser. [`WebEffects`] drives them through `web-sys`; native builds
//! use [`LogEffects`], which records the same requests in the log.

use instant::Duration;

/// A sine blip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration: Duration,
    pub gain: f32,
}

/// Confirmation blip played when a menu item is selected.
pub const SELECT_TONE: Tone = Tone {
    frequency_hz: 300.0,
    duration: Duration::from_millis(100),
    gain: 0.5,
};

pub trait MenuEffects {
    /// Leave the scene for `link`.
    fn navigate(&mut self, link: &str);

    fn play_tone(&mut self, tone: &Tone);

    /// Show the label of the hovered item, or hide the description.
    fn describe(&mut self, label: Option<&str>);
}

#[derive(Debug, Default)]
pub struct LogEffects;

impl MenuEffects for LogEffects {
    fn navigate(&mut self, link: &str) {
        log::info!("Navigate to {}", link);
    }

    fn play_tone(&mut self, tone: &Tone) {
        log::info!(
            "Tone: {} Hz for {:?} at gain {}",
            tone.frequency_hz,
            tone.duration,
            tone.gain
        );
    }

    fn describe(&mut self, label: Option<&str>) {
        match label {
            Some(label) => log::debug!("Hovering {}", label),
            None => log::debug!("Description hidden"),
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebEffects;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::{AudioContext, HtmlElement, OscillatorType};

    use super::{MenuEffects, Tone};

    const DESCRIPTION_ID: &str = "menu-description";
    const SELECTED_ID: &str = "selected-item";

    /// Browser effects. The audio context is created on first use, which
    /// happens inside a click handler as browsers require.
    #[derive(Debug, Default)]
    pub struct WebEffects {
        audio: Option<AudioContext>,
    }

    impl WebEffects {
        fn audio(&mut self) -> Result<&AudioContext, JsValue> {
            if self.audio.is_none() {
                self.audio = Some(AudioContext::new()?);
            }
            self.audio
                .as_ref()
                .ok_or_else(|| JsValue::from_str("audio context unavailable"))
        }

        fn try_play(&mut self, tone: &Tone) -> Result<(), JsValue> {
            let ctx = self.audio()?;
            let oscillator = ctx.create_oscillator()?;
            let gain = ctx.create_gain()?;
            oscillator.connect_with_audio_node(&gain)?;
            gain.connect_with_audio_node(&ctx.destination())?;

            oscillator.set_type(OscillatorType::Sine);
            oscillator.frequency().set_value(tone.frequency_hz);
            let now = ctx.current_time();
            gain.gain().set_value_at_time(tone.gain, now)?;
            oscillator.start()?;
            oscillator.stop_with_when(now + tone.duration.as_secs_f64())?;
            Ok(())
        }

        fn element(id: &str) -> Option<HtmlElement> {
            web_sys::window()?
                .document()?
                .get_element_by_id(id)?
                .dyn_into::<HtmlElement>()
                .ok()
        }
    }

    impl MenuEffects for WebEffects {
        fn navigate(&mut self, link: &str) {
            let Some(window) = web_sys::window() else {
                return;
            };
            if let Err(e) = window.location().set_href(link) {
                log::error!("Navigation to {} failed: {:?}", link, e);
            }
        }

        fn play_tone(&mut self, tone: &Tone) {
            if let Err(e) = self.try_play(tone) {
                log::warn!("Could not play menu sound: {:?}", e);
            }
        }

        fn describe(&mut self, label: Option<&str>) {
            let Some(description) = Self::element(DESCRIPTION_ID) else {
                return;
            };
            let opacity = if label.is_some() { "1" } else { "0" };
            if let Err(e) = description.style().set_property("opacity", opacity) {
                log::warn!("Could not update the menu description: {:?}", e);
            }
            if let (Some(label), Some(selected)) = (label, Self::element(SELECTED_ID)) {
                selected.set_text_content(Some(label));
            }
        }
    }
}

/// The effects implementation for the current target.
#[cfg(not(target_arch = "wasm32"))]
pub fn platform_effects() -> Box<dyn MenuEffects> {
    Box::new(LogEffects)
}

#[cfg(target_arch = "wasm32")]
pub fn platform_effects() -> Box<dyn MenuEffects> {
    Box::new(WebEffects::default())
}
