//! Terminal output for `Tessel`.
//!
//! - [`sink`]: [`CrosstermSink`], a display sink that draws with crossterm
//! - [`config`]: [`ConsoleConfig`], loaded from TOML
//! - [`console`]: [`Console`], a session tying a compositor to a terminal
//!
//! # Example
//!
//! ```no_run
//! use tessel_core::{Color, Rect};
//! use tessel_terminal::{Console, ConsoleConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConsoleConfig::load("console.toml")?;
//! let mut console = Console::stdout(config)?;
//! console.setup()?;
//!
//! let window = console.create_surface(Rect::new(4, 2, 30, 8))?;
//! if let Some(mut surface) = console.surface_mut(window) {
//!     surface.fill(' ', Color::WHITE, Color::BLUE);
//!     surface.print(2, 1, "Hello from tessel");
//! }
//! console.present()?;
//! console.teardown()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]

pub mod config;
pub mod console;
pub mod sink;

pub use config::{ConfigError, ConfigResult, ConsoleConfig};
pub use console::Console;
pub use sink::CrosstermSink;
