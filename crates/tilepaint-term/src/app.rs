//! The Elm-architecture application loop: [`Model`], [`Driver`], [`Effect`],
//! [`App`].
//!
//! All model updates and draws run on the calling thread, one message at a
//! time. Commands ([`Effect::Cmd`]) run on worker threads and feed their
//! result back as an ordinary message.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crate::messages::Msg;
use crate::screen::{Frame, Screen, compute_frame};

// ---------------------------------------------------------------------------
// Context (cancellation token)
// ---------------------------------------------------------------------------

/// A cooperative-cancellation token backed by an [`AtomicBool`].
#[derive(Clone, Debug, Default)]
pub struct Context {
    done: Arc<AtomicBool>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// A side-effect returned by [`Model::update`].
pub enum Effect {
    /// A one-shot command run off the update loop. Its message, if any, is
    /// delivered back to the model.
    Cmd(Box<dyn FnOnce() -> Option<Msg> + Send>),
    /// Signal the application loop to stop.
    End,
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cmd(_) => f.write_str("Effect::Cmd(..)"),
            Self::End => f.write_str("Effect::End"),
        }
    }
}

/// Convenience constructor for an [`Effect::Cmd`].
pub fn cmd<F>(f: F) -> Effect
where
    F: FnOnce() -> Option<Msg> + Send + 'static,
{
    Effect::Cmd(Box::new(f))
}

// ---------------------------------------------------------------------------
// Model / Driver
// ---------------------------------------------------------------------------

/// The application model.
pub trait Model {
    /// Process a message, optionally returning a side-effect.
    fn update(&mut self, msg: Msg) -> Option<Effect>;

    /// Render the current state into `screen`.
    fn draw(&self, screen: &mut Screen);
}

/// Back-end driver (terminal, test harness, ...).
pub trait Driver {
    /// Initialise the back-end.
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Current screen size, if the back-end knows it.
    fn size(&self) -> Option<(i32, i32)> {
        None
    }

    /// Send any pending input through `tx`, waiting briefly for some.
    /// Should return promptly once `ctx.is_done()`.
    fn poll_msgs(
        &mut self,
        ctx: &Context,
        tx: Sender<Msg>,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Flush a computed frame to the screen.
    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Restore the back-end.
    fn close(&mut self);
}

// ---------------------------------------------------------------------------
// AppConfig / App
// ---------------------------------------------------------------------------

/// Configuration for creating an [`App`].
pub struct AppConfig<M: Model, D: Driver> {
    pub model: M,
    pub driver: D,
    /// Screen size used when the driver cannot report one.
    pub width: i32,
    pub height: i32,
}

/// The main application runner.
pub struct App<M: Model, D: Driver> {
    model: M,
    driver: D,
    width: i32,
    height: i32,
}

impl<M: Model, D: Driver> App<M, D> {
    pub fn new(config: AppConfig<M, D>) -> Self {
        Self {
            model: config.model,
            driver: config.driver,
            width: config.width,
            height: config.height,
        }
    }

    /// Run the Model-View-Update loop until the model returns
    /// [`Effect::End`] or a [`Msg::Quit`] arrives.
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.driver.init()?;
        let result = self.run_loop();
        self.driver.close();
        result
    }

    /// Consume the app, returning the model.
    pub fn into_model(self) -> M {
        self.model
    }

    fn run_loop(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let ctx = Context::new();
        let (tx, rx): (Sender<Msg>, Receiver<Msg>) = mpsc::channel();

        if let Some((w, h)) = self.driver.size() {
            self.width = w;
            self.height = h;
        }
        let mut prev = Screen::new(self.width, self.height);
        let mut curr = Screen::new(self.width, self.height);

        tx.send(Msg::Init).ok();
        tx.send(Msg::Screen {
            width: self.width,
            height: self.height,
            time: Instant::now(),
        })
        .ok();
        self.process_pending(&rx, &ctx, &tx, &mut prev, &mut curr)?;

        while !ctx.is_done() {
            self.driver.poll_msgs(&ctx, tx.clone())?;
            if ctx.is_done() {
                break;
            }
            self.process_pending(&rx, &ctx, &tx, &mut prev, &mut curr)?;
        }
        Ok(())
    }

    /// Drain queued messages, update the model, draw, diff, and flush.
    fn process_pending(
        &mut self,
        rx: &Receiver<Msg>,
        ctx: &Context,
        tx: &Sender<Msg>,
        prev: &mut Screen,
        curr: &mut Screen,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut needs_draw = false;

        while let Ok(msg) = rx.try_recv() {
            match msg {
                Msg::Quit => {
                    ctx.cancel();
                    return Ok(());
                }
                Msg::Screen { width, height, .. } => {
                    self.width = width;
                    self.height = height;
                    *curr = Screen::new(width, height);
                    if let Some(effect) = self.model.update(msg) {
                        self.handle_effect(effect, ctx, tx);
                    }
                }
                msg => {
                    if let Some(effect) = self.model.update(msg) {
                        self.handle_effect(effect, ctx, tx);
                    }
                }
            }
            if ctx.is_done() {
                return Ok(());
            }
            needs_draw = true;
        }

        if needs_draw {
            self.model.draw(curr);
            let frame = compute_frame(prev, curr);
            if !frame.cells.is_empty() {
                self.driver.flush(frame)?;
            }
            prev.clone_from(curr);
        }

        Ok(())
    }

    fn handle_effect(&self, effect: Effect, ctx: &Context, tx: &Sender<Msg>) {
        match effect {
            Effect::End => ctx.cancel(),
            Effect::Cmd(f) => {
                let tx = tx.clone();
                let spawned = thread::Builder::new()
                    .name("tilepaint-cmd".into())
                    .spawn(move || {
                        if let Some(msg) = f() {
                            tx.send(msg).ok();
                        }
                    });
                if let Err(err) = spawned {
                    log::error!("failed to spawn command thread: {err}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use super::*;
    use crate::messages::{Key, Msg};
    use crate::screen::{Cell, Point, Style};

    /// Counts keys; `c` spawns a command, `q` ends.
    #[derive(Default)]
    struct Counter {
        keys: usize,
        echoes: Arc<AtomicUsize>,
    }

    impl Model for Counter {
        fn update(&mut self, msg: Msg) -> Option<Effect> {
            match msg {
                Msg::KeyDown { key: Key::Char('q'), .. } => Some(Effect::End),
                Msg::KeyDown { key: Key::Char('c'), .. } => {
                    Some(cmd(|| Some(Msg::custom("echo"))))
                }
                Msg::KeyDown { .. } => {
                    self.keys += 1;
                    None
                }
                Msg::Custom(_) => {
                    self.echoes.fetch_add(1, Ordering::SeqCst);
                    None
                }
                _ => None,
            }
        }

        fn draw(&self, screen: &mut Screen) {
            screen.set(
                Point::new(0, 0),
                Cell::new(char::from(b'0' + self.keys as u8), Style::default()),
            );
        }
    }

    /// Replays scripted batches, one per poll. An empty batch idles until
    /// the model has seen `wanted` command results.
    struct Script {
        batches: VecDeque<Vec<Msg>>,
        echoes: Arc<AtomicUsize>,
        wanted: usize,
        deadline: Instant,
    }

    impl Driver for Script {
        fn init(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            Ok(())
        }

        fn poll_msgs(
            &mut self,
            _ctx: &Context,
            tx: Sender<Msg>,
        ) -> Result<(), Box<dyn std::error::Error>> {
            match self.batches.pop_front() {
                Some(batch) if batch.is_empty() => {
                    let seen = self.echoes.load(Ordering::SeqCst);
                    if seen < self.wanted && Instant::now() < self.deadline {
                        self.batches.push_front(batch);
                        thread::sleep(Duration::from_millis(5));
                    }
                }
                Some(batch) => batch.into_iter().for_each(|m| {
                    tx.send(m).ok();
                }),
                None => thread::sleep(Duration::from_millis(10)),
            }
            Ok(())
        }

        fn flush(&mut self, _frame: Frame) -> Result<(), Box<dyn std::error::Error>> {
            Ok(())
        }

        fn close(&mut self) {}
    }

    #[test]
    fn runs_until_end_and_feeds_commands_back() {
        let model = Counter::default();
        let driver = Script {
            batches: VecDeque::from(vec![
                vec![Msg::key(Key::Char('a')), Msg::key(Key::Char('b'))],
                vec![Msg::key(Key::Char('c'))],
                Vec::new(),
                vec![Msg::key(Key::Char('q'))],
            ]),
            echoes: Arc::clone(&model.echoes),
            wanted: 1,
            deadline: Instant::now() + Duration::from_secs(5),
        };
        let mut app = App::new(AppConfig {
            model,
            driver,
            width: 4,
            height: 2,
        });
        app.run().unwrap();
        let model = app.into_model();
        assert_eq!(model.keys, 2);
        assert_eq!(model.echoes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn quit_message_stops_the_loop() {
        let driver = Script {
            batches: VecDeque::from(vec![vec![Msg::Quit, Msg::key(Key::Char('a'))]]),
            echoes: Arc::new(AtomicUsize::new(0)),
            wanted: 0,
            deadline: Instant::now(),
        };
        let mut app = App::new(AppConfig {
            model: Counter::default(),
            driver,
            width: 4,
            height: 2,
        });
        app.run().unwrap();
        assert_eq!(app.into_model().keys, 0);
    }
}
