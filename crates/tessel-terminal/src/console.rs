//! The console session: configuration, compositor and terminal sink.

use std::io::{self, Stdout, Write};

use tessel_compositor::{Compositor, DetachedSurface, FlushStats, Surface, SurfaceId, SurfaceMut};
use tessel_core::{Color, Rect, Result, Size};
use tracing::debug;

use crate::config::{ConfigError, ConfigResult, ConsoleConfig};
use crate::sink::CrosstermSink;

/// A console session.
///
/// The console owns a [`Compositor`] whose root is the main surface, cleared
/// to the configured colors at start. Surfaces created through the console
/// attach to the main surface unless a parent is given, and take the
/// configured background.
///
/// # Examples
///
/// ```
/// use tessel_core::Rect;
/// use tessel_terminal::{Console, ConsoleConfig};
///
/// let mut console = Console::new(ConsoleConfig::new(20, 5), Vec::new()).unwrap();
/// let status = console.create_surface(Rect::new(0, 4, 20, 1)).unwrap();
/// console.surface_mut(status).unwrap().print(0, 0, "ready");
///
/// let stats = console.present().unwrap();
/// assert!(stats.full_repaint);
/// ```
pub struct Console<W: Write = Stdout> {
    config: ConsoleConfig,
    background: Color,
    compositor: Compositor,
    sink: CrosstermSink<W>,
}

impl<W: Write> std::fmt::Debug for Console<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("config", &self.config)
            .field("compositor", &self.compositor)
            .field("sink", &self.sink)
            .finish()
    }
}

impl Console<Stdout> {
    /// Creates a console drawing to standard output.
    pub fn stdout(config: ConsoleConfig) -> ConfigResult<Self> {
        Self::new(config, io::stdout())
    }
}

impl<W: Write> Console<W> {
    /// Creates a console drawing to `writer`.
    pub fn new(config: ConsoleConfig, writer: W) -> ConfigResult<Self> {
        config.validate()?;
        let background = config.background_color()?;
        let foreground = config.foreground_color()?;

        let mut compositor = Compositor::with_background(config.width, config.height, background)
            .map_err(|e| ConfigError::Invalid {
                key: "width".to_string(),
                message: e.to_string(),
            })?;
        let main = compositor.root();
        if let Some(mut surface) = compositor.surface_mut(main) {
            surface.fill(' ', foreground, background);
        }

        let sink = CrosstermSink::new(writer, config.width, config.height);
        debug!(width = config.width, height = config.height, "console created");

        Ok(Self {
            config,
            background,
            compositor,
            sink,
        })
    }

    /// The configuration this console was built from.
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Console dimensions in cells.
    pub fn size(&self) -> Size {
        self.compositor.size()
    }

    /// The main surface, root of every surface tree in this console.
    pub fn main_surface(&self) -> SurfaceId {
        self.compositor.root()
    }

    /// Creates a surface attached to the main surface.
    pub fn create_surface(&mut self, rect: Rect) -> Result<SurfaceId> {
        let main = self.main_surface();
        self.create_child(main, rect)
    }

    /// Creates a surface attached to `parent`.
    pub fn create_child(&mut self, parent: SurfaceId, rect: Rect) -> Result<SurfaceId> {
        let surface = DetachedSurface::new(rect).with_background(self.background);
        self.compositor.attach(surface, parent)
    }

    /// Attaches a detached surface to `parent`.
    pub fn attach(&mut self, surface: DetachedSurface, parent: SurfaceId) -> Result<SurfaceId> {
        self.compositor.attach(surface, parent)
    }

    /// Returns a surface for reading.
    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.compositor.surface(id)
    }

    /// Returns a view for editing a surface.
    pub fn surface_mut(&mut self, id: SurfaceId) -> Option<SurfaceMut<'_>> {
        self.compositor.surface_mut(id)
    }

    /// Destroys a surface and its descendants.
    pub fn destroy(&mut self, id: SurfaceId) -> Result<usize> {
        self.compositor.destroy(id)
    }

    /// The underlying compositor.
    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// The underlying compositor, mutably.
    pub fn compositor_mut(&mut self) -> &mut Compositor {
        &mut self.compositor
    }

    /// The terminal sink.
    pub fn sink(&self) -> &CrosstermSink<W> {
        &self.sink
    }

    /// The terminal sink, mutably.
    pub fn sink_mut(&mut self) -> &mut CrosstermSink<W> {
        &mut self.sink
    }

    /// Hides the cursor, clears the terminal and schedules a full repaint.
    pub fn setup(&mut self) -> Result<()> {
        self.sink.setup()?;
        self.compositor.mark_all_dirty();
        Ok(())
    }

    /// Restores the cursor and colors.
    pub fn teardown(&mut self) -> Result<()> {
        self.sink.teardown()
    }

    /// Flushes the compositor into the sink and presents it.
    pub fn present(&mut self) -> Result<FlushStats> {
        let stats = self.compositor.flush(&mut self.sink);
        self.sink.present()?;
        Ok(stats)
    }

    /// Consumes the console, returning the writer.
    pub fn into_writer(self) -> W {
        self.sink.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tessel_core::{Error, Glyph};

    fn console(width: u16, height: u16) -> Console<Vec<u8>> {
        Console::new(ConsoleConfig::new(width, height), Vec::new()).unwrap()
    }

    #[test]
    fn test_main_surface_is_filled_with_config_colors() {
        let config = ConsoleConfig {
            background: "#0000FF".to_string(),
            foreground: "yellow".to_string(),
            ..ConsoleConfig::new(3, 2)
        };
        let console = Console::new(config, Vec::new()).unwrap();
        let main = console.surface(console.main_surface()).unwrap();
        assert!(main.is_root());
        assert!(main
            .glyphs()
            .iter()
            .all(|g| *g == Glyph::new(' ', Color::YELLOW, Color::BLUE)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ConsoleConfig {
            background: "nope".to_string(),
            ..ConsoleConfig::default()
        };
        assert!(matches!(
            Console::new(config, Vec::new()),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_create_surface_attaches_to_main() {
        let mut console = console(10, 4);
        let panel = console.create_surface(Rect::new(1, 1, 3, 2)).unwrap();
        let label = console.create_child(panel, Rect::new(0, 0, 2, 1)).unwrap();

        assert_eq!(
            console.surface(panel).unwrap().parent(),
            Some(console.main_surface())
        );
        assert_eq!(console.surface(label).unwrap().parent(), Some(panel));
        assert_eq!(console.surface(panel).unwrap().background(), Color::BLACK);
    }

    #[test]
    fn test_main_surface_cannot_be_destroyed() {
        let mut console = console(4, 4);
        let main = console.main_surface();
        assert!(matches!(
            console.destroy(main),
            Err(Error::InvalidDetachment(_))
        ));
    }

    #[test]
    fn test_present_writes_to_terminal() {
        let mut console = console(8, 2);
        let label = console.create_surface(Rect::new(2, 0, 5, 1)).unwrap();
        console.surface_mut(label).unwrap().print(0, 0, "hello");

        let stats = console.present().unwrap();
        assert_eq!(stats.cells_emitted, 16);

        console.surface_mut(label).unwrap().set_glyph(0, 0, 'j');
        let stats = console.present().unwrap();
        assert_eq!(stats.cells_emitted, 1);

        let out = String::from_utf8(console.into_writer()).unwrap();
        assert!(out.contains("hello"));
        assert!(out.contains('j'));
    }

    #[test]
    fn test_setup_forces_full_repaint() {
        let mut console = console(3, 3);
        console.present().unwrap();
        console.setup().unwrap();
        assert!(console.compositor().needs_full_repaint());
        assert_eq!(console.present().unwrap().cells_emitted, 9);
    }
}
