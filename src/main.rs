use std::io;
use std::rc::Rc;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use indoc::indoc;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::Level;

use winstack::ManagerConfig;
use winstack::debug_log::{DebugLogHandle, set_global_debug_log};
use winstack::drivers::{ConsoleDriver, ScriptedDriver};
use winstack::event_loop::{ControlFlow, EventLoop};
use winstack::keybindings::KeyBindings;
use winstack::scheduler::{ManualClock, SystemClock};
use winstack::screens::{DemoApp, DemoOptions};
use winstack::tracing_sub;
use winstack::ui;

const AFTER_HELP: &str = indoc! {"
    Keys:
      l / d      open level select / level detail
      r / o      open rank / own rank detail
      m          open matching
      b / Enter  show a message after a delay / close it
      Esc        back
      w          toggle waiting for hide animations
      z / c / h  reset windows / clear back sequence / hide all
      q          quit

    --headless replays a fixed navigation script against a virtual clock and
    prints the manager state after every step.
"};

#[derive(Debug, Parser)]
#[command(name = "winstack", about = "Window stack navigation demo", after_help = AFTER_HELP)]
struct Args {
    /// Keep hidden windows in the shown set until their exit animation ends.
    #[arg(long)]
    wait_hide: bool,

    /// Length of one loop tick in milliseconds.
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,

    /// Length of the enter and exit animations, in ticks.
    #[arg(long, default_value_t = 15)]
    anim_ticks: u32,

    /// Run the scripted scenario without a terminal UI.
    #[arg(long)]
    headless: bool,
}

impl Args {
    fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    fn animation(&self) -> Result<Duration, clap::Error> {
        self.tick().checked_mul(self.anim_ticks).ok_or_else(|| {
            Args::command().error(
                ErrorKind::ValueValidation,
                "--tick-ms multiplied by --anim-ticks is too large",
            )
        })
    }
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let animation = args.animation().unwrap_or_else(|err| err.exit());
    let tick = args.tick();
    let options = DemoOptions {
        config: ManagerConfig::default().with_wait_for_hide_completion(args.wait_hide),
        animation,
        ..DemoOptions::default()
    };
    if args.headless {
        run_headless(options, tick)
    } else {
        run_terminal(options, tick)
    }
}

fn run_terminal(options: DemoOptions, tick: Duration) -> io::Result<()> {
    let log = DebugLogHandle::default();
    set_global_debug_log(log.clone());
    tracing_sub::init(Level::DEBUG);

    let mut app = DemoApp::new(options, Rc::new(SystemClock));
    app.boot();
    let bindings = KeyBindings::default();

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    terminal::enable_raw_mode()?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let mut event_loop = EventLoop::new(ConsoleDriver::new(), tick);

    let result = event_loop.run(|_, event| {
        match event {
            None => {
                app.tick();
                terminal.draw(|frame| ui::draw(frame, &app, &bindings, Some(&log)))?;
            }
            Some(Event::Key(key)) => {
                if let Some(action) = bindings.action_for_key(&key)
                    && !app.apply(action)
                {
                    return Ok(ControlFlow::Quit);
                }
            }
            Some(_) => {}
        }
        Ok(ControlFlow::Continue)
    });

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    app.shutdown();

    result
}

fn scenario() -> Vec<Event> {
    let key = |code| Event::Key(KeyEvent::new(code, KeyModifiers::NONE));
    let back = key(KeyCode::Esc);
    vec![
        key(KeyCode::Char('r')),
        key(KeyCode::Char('o')),
        back.clone(),
        back.clone(),
        back.clone(),
        key(KeyCode::Char('l')),
        key(KeyCode::Char('d')),
        back.clone(),
        key(KeyCode::Char('b')),
        key(KeyCode::Enter),
        key(KeyCode::Char('m')),
        back,
    ]
}

fn run_headless(options: DemoOptions, tick: Duration) -> io::Result<()> {
    tracing_sub::init(Level::INFO);

    let clock = ManualClock::new();
    let mut app = DemoApp::new(options, Rc::new(clock.clone()));
    app.boot();
    print_state("boot", &app);

    let bindings = KeyBindings::default();
    let settle_ticks =
        options.animation.saturating_add(options.message_delay).as_millis() / tick.as_millis().max(1) + 2;
    let mut event_loop = EventLoop::new(ScriptedDriver::new(scenario()), Duration::ZERO);

    event_loop.run(|driver, event| {
        let Some(Event::Key(key)) = event else {
            return Ok(if driver.remaining() == 0 {
                ControlFlow::Quit
            } else {
                ControlFlow::Continue
            });
        };
        let Some(action) = bindings.action_for_key(&key) else {
            return Ok(ControlFlow::Continue);
        };
        if !app.apply(action) {
            return Ok(ControlFlow::Quit);
        }
        for _ in 0..settle_ticks {
            clock.advance(tick);
            app.tick();
        }
        print_state(&action.to_string(), &app);
        Ok(ControlFlow::Continue)
    })?;

    app.shutdown();
    Ok(())
}

fn print_state(step: &str, app: &DemoApp) {
    println!("== {step}");
    println!("   shown: {}", app.visible_titles().join(", "));
    for line in ui::status_lines(app) {
        println!("   {line}");
    }
}
