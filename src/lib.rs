//! Orbita: server-driven page navigation and forms.
//!
//! The server owns routing and data. The client fetches page descriptors
//! (component name + props) through the [`router::Router`], mounts them with
//! an [`app::App`], and submits [`form::Form`]s back to the server.

pub mod app;
pub mod config;
pub mod form;
pub mod link;
pub mod logging;
pub mod mvi;
pub mod page;
pub mod router;
pub mod transport;

pub use app::{use_orbita, App, AppContext, ConfigurationError};
pub use form::{Form, FormOptions};
pub use link::Link;
pub use page::{PageDescriptor, StartupError};
pub use router::{Router, VisitOptions, VisitOutcome};
