//! chat-router: utterance classification and dispatch to smart-home handlers
//!
//! One inbound chat message is classified into a closed set of intents
//! (device, shopping, calendar, weather, unknown) and dispatched to the
//! matching handler. Device intents run through the compound-command
//! pipeline; the other handlers are thin lookups. Every failure path
//! degrades to a reply, never to an aborted turn.

mod error;
pub use error::{Error, Result};

mod types;
pub use types::{Intent, IntentResult, OutboundMessage};

mod classify;
pub use classify::{parse_intent, Classifier, SYSTEM_INSTRUCTIONS};

mod lookups;
pub use lookups::{CalendarLinks, ShoppingLinks, WeatherLookup};

mod reply;
pub use reply::compose_device_reply;

mod router;
pub use router::Router;

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{CannedWeather, KeywordClassifier, ScriptedClassifier};

#[cfg(feature = "gemini")]
mod gemini;
#[cfg(feature = "gemini")]
pub use gemini::GeminiClassifier;

#[cfg(feature = "weather-http")]
mod weather_http;
#[cfg(feature = "weather-http")]
pub use weather_http::WttrWeather;
