mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    sync::mpsc,
    thread,
    time::Duration,
};

use klava::config::{ConfigStore, FileConfigStore};
use klava::corpus::Corpus;
use klava::session::{Feedback, Phase, Session};

const TICK_RATE_MS: u64 = 100;

/// terminal typing speed trainer
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Reproduce a sample sentence as fast as you can. Typing time is measured \
                  with pause support, and typographic dash/quote variants are accepted."
)]
pub struct Cli {
    /// corpus to draw target sentences from (persisted as the new default)
    #[clap(short, long)]
    corpus: Option<String>,

    /// fixed target text instead of a random sentence
    #[clap(short, long)]
    text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Control {
    Continue,
    Quit,
}

pub struct App {
    pub session: Session,
    pub corpus: Corpus,
    pub input: String,
    pub feedback: Option<Feedback>,
}

impl App {
    pub fn new(corpus: Corpus) -> Self {
        Self {
            session: Session::new(),
            corpus,
            input: String::new(),
            feedback: None,
        }
    }

    fn judge(&mut self) -> Result<(), Box<dyn Error>> {
        self.feedback = Some(self.session.submit(&self.input)?);
        Ok(())
    }

    /// Map a key press onto a session operation. Only operations valid in
    /// the current phase are wired up, so the session never sees an invalid
    /// transition from here.
    fn on_key(&mut self, key: KeyEvent) -> Result<Control, Box<dyn Error>> {
        match key.code {
            KeyCode::Esc => return Ok(Control::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(Control::Quit);
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.session.phase() != Phase::Idle {
                    self.session.reset()?;
                    self.input.clear();
                    self.feedback = None;
                }
            }
            KeyCode::Enter => match self.session.phase() {
                Phase::Idle | Phase::Finished => {
                    self.input.clear();
                    self.feedback = None;
                    self.session.start(&self.corpus)?;
                }
                Phase::Typing => {
                    self.input.push('\n');
                    self.judge()?;
                }
                Phase::Paused => {}
            },
            KeyCode::Tab => match self.session.phase() {
                Phase::Typing => self.session.pause()?,
                Phase::Paused => self.session.resume()?,
                _ => {}
            },
            KeyCode::Backspace => {
                if self.session.phase() == Phase::Typing && !self.input.is_empty() {
                    self.input.pop();
                    self.judge()?;
                }
            }
            KeyCode::Char(c) => {
                if self.session.phase() == Phase::Typing {
                    self.input.push(c);
                    self.judge()?;
                }
            }
            _ => {}
        }
        Ok(Control::Continue)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let mut config = store.load();
    if let Some(name) = &cli.corpus {
        config.corpus = name.clone();
        let _ = store.save(&config);
    }

    let corpus = match cli.text {
        Some(text) => Corpus::from_text(text),
        None => Corpus::load(&config.corpus)?,
    };

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(corpus);
    start_tui(&mut terminal, &mut app)?;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let events = get_trainer_events();

    terminal.draw(|f| ui(app, f))?;

    loop {
        match events.recv()? {
            TrainerEvent::Tick => {
                // Redraw on ticks only while the timer is visibly running
                if app.session.phase() == Phase::Typing {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            TrainerEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            TrainerEvent::Key(key) => match app.on_key(key)? {
                Control::Quit => break,
                Control::Continue => {
                    terminal.draw(|f| ui(app, f))?;
                }
            },
        }
    }

    Ok(())
}

#[derive(Clone, Debug)]
enum TrainerEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

fn get_trainer_events() -> mpsc::Receiver<TrainerEvent> {
    let (tx, rx) = mpsc::channel();

    let tick_tx = tx.clone();
    thread::spawn(move || loop {
        if tick_tx.send(TrainerEvent::Tick).is_err() {
            break;
        }
        thread::sleep(Duration::from_millis(TICK_RATE_MS));
    });

    thread::spawn(move || loop {
        match event::read() {
            Ok(Event::Key(key)) => {
                if tx.send(TrainerEvent::Key(key)).is_err() {
                    break;
                }
            }
            Ok(Event::Resize(_, _)) => {
                if tx.send(TrainerEvent::Resize).is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(_) => break,
        }
    });

    rx
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
