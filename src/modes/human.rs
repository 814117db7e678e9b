use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{debug, info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use tokio::time::interval;

use crate::clock::TickClock;
use crate::game::{GameConfig, Simulation, Status};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Keyboard-driven play in the terminal
pub struct HumanMode {
    config: GameConfig,
    simulation: Simulation,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    paused: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let simulation = Simulation::new(&config).context("Failed to start a session")?;

        Ok(Self {
            config,
            simulation,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            paused: false,
        })
    }

    /// Take over the terminal and play until the user quits. `clock` paces simulation ticks.
    pub async fn run(&mut self, clock: TickClock) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_game_loop(&mut terminal, clock).await;

        // Restore the terminal even when the loop failed
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
        mut clock: TickClock,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut render_timer = interval(self.config.render_interval());

        info!("Game loop started, tick every {:?}", clock.period());

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event, &mut clock),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                _ = clock.tick() => {
                    self.tick();
                }

                _ = render_timer.tick() => {
                    self.metrics.update(self.simulation.status());
                    let snapshot = self.simulation.snapshot();
                    terminal.draw(|frame| {
                        self.renderer.render(
                            frame,
                            &snapshot,
                            self.simulation.grid(),
                            self.paused,
                            &self.metrics,
                        );
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!("Quit requested");
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event, clock: &mut TickClock) {
        let Event::Key(key) = event else {
            return;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Turn(direction) => {
                if self.paused {
                    return;
                }
                if !self.simulation.request_direction(direction) {
                    debug!("Ignored turn {direction:?}");
                }
            }
            KeyAction::TogglePause => self.toggle_pause(clock),
            KeyAction::Restart => {
                self.reset_game();
                clock.reset();
            }
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn toggle_pause(&mut self, clock: &mut TickClock) {
        if !self.simulation.is_running() {
            return;
        }
        self.paused = !self.paused;
        if self.paused {
            self.metrics.on_pause();
        } else {
            self.metrics.on_resume();
            clock.reset();
        }
        debug!("Paused: {}", self.paused);
    }

    fn tick(&mut self) {
        if self.paused || !self.simulation.is_running() {
            return;
        }

        let report = self.simulation.update();

        if let Status::Over(reason) = report.status {
            self.metrics.on_game_over(self.simulation.score(), reason);
        }
    }

    fn reset_game(&mut self) {
        match Simulation::new(&self.config) {
            Ok(simulation) => {
                info!("Restarting session");
                self.simulation = simulation;
                self.metrics.on_game_start();
                self.paused = false;
            }
            Err(err) => warn!("Could not restart: {err:#}"),
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
