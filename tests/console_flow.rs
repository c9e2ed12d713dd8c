use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use cmdconsole::infrastructure::adapters::BufferedOutput;
use cmdconsole::infrastructure::input::{ChannelLineSource, ScriptedLineSource};
use cmdconsole::{
    CommandHandler, Console, ConsoleError, ConsoleIo, ConsoleSettings, FlagDef, FlagValue,
    InputKind, LineSource, LogConfigurator, LogRouting, LogSink, ReadOutcome, StartMode,
    StartupOutcome, StartupPhase,
};

type Events = Arc<Mutex<Vec<String>>>;

#[derive(Clone, Default)]
struct RecordingLogging {
    events: Events,
    routings: Arc<Mutex<Vec<LogRouting>>>,
}

impl LogConfigurator for RecordingLogging {
    fn apply(&self, routing: &LogRouting) -> anyhow::Result<()> {
        self.events.lock().unwrap().push("logging".to_string());
        self.routings.lock().unwrap().push(routing.clone());
        Ok(())
    }
}

struct Fixture {
    console: Console,
    output: BufferedOutput,
    logging: RecordingLogging,
    events: Events,
}

fn fixture_with(input: impl LineSource + 'static, settings: ConsoleSettings) -> Fixture {
    let output = BufferedOutput::new();
    let events = Events::default();
    let logging = RecordingLogging {
        events: Arc::clone(&events),
        routings: Arc::default(),
    };
    let io = ConsoleIo {
        input: Box::new(input),
        output: Arc::new(output.clone()),
        logging: Box::new(logging.clone()),
    };
    let console = Console::new("demo", settings, io).unwrap();
    Fixture {
        console,
        output,
        logging,
        events,
    }
}

fn fixture(input: impl LineSource + 'static) -> Fixture {
    fixture_with(input, ConsoleSettings::default())
}

fn record(events: &Events, event: impl Into<String>) {
    events.lock().unwrap().push(event.into());
}

/// `build` 명령(`--jobs/-j <int>`, `--release`)을 등록하고 호출 횟수 카운터를 돌려준다.
fn add_build(fx: &mut Fixture) -> Arc<AtomicUsize> {
    let calls = Arc::new(AtomicUsize::new(0));
    let events = Arc::clone(&fx.events);
    let jobs_events = Arc::clone(&fx.events);
    let counter = Arc::clone(&calls);

    fx.console
        .add_command(
            "build",
            CommandHandler::call(move |ctx| {
                counter.fetch_add(1, Ordering::SeqCst);
                record(
                    &events,
                    format!(
                        "command {} args={:?} flag={:?}",
                        ctx.command_name, ctx.args, ctx.flag_name
                    ),
                );
                Ok(())
            }),
            "compile the project",
            "<target>",
        )
        .unwrap()
        .add_flag(
            FlagDef::new("jobs")
                .short("j")
                .input(InputKind::Int)
                .description("parallel jobs")
                .handler(move |ctx| {
                    record(
                        &jobs_events,
                        format!("flag {:?} {:?}", ctx.flag_name, ctx.flag_input),
                    );
                    Ok(())
                }),
        )
        .unwrap()
        .add_flag(FlagDef::new("release").description("optimized build"))
        .unwrap();
    calls
}

fn events(fx: &Fixture) -> Vec<String> {
    fx.events.lock().unwrap().clone()
}

#[test]
fn flags_run_before_command_with_leftover_args() {
    let mut fx = fixture(ScriptedLineSource::default());
    add_build(&mut fx);

    fx.console.dispatch_line("build -j 4 extra").unwrap();

    assert_eq!(
        events(&fx),
        vec![
            "flag Some(\"--jobs\") Some(Int(4))".to_string(),
            "command build args=[\"extra\"] flag=None".to_string(),
        ]
    );
}

#[test]
fn unbound_flags_reach_default_handler() {
    let mut fx = fixture(ScriptedLineSource::default());
    let calls = add_build(&mut fx);
    let seen = Arc::clone(&fx.events);
    fx.console.set_default_flag_handler(move |ctx| {
        record(&seen, format!("default {:?}", ctx.flag_name));
        Ok(())
    });

    fx.console.dispatch_line("build --release").unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(events(&fx)[0], "default Some(\"--release\")");
}

#[test]
fn command_help_flag_skips_all_handlers() {
    let mut fx = fixture(ScriptedLineSource::default());
    let calls = add_build(&mut fx);

    fx.console.dispatch_line("build -j 2 --help").unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(events(&fx).is_empty());
    let text = fx.output.text();
    assert!(text.contains("usage: build [flags] <target>"));
    assert!(text.contains("--jobs, -j <int>"));
}

#[test]
fn startup_help_short_circuits_other_flags() {
    let mut fx = fixture(ScriptedLineSource::default());
    let seen = Arc::clone(&fx.events);
    fx.console
        .terminal_add_flag(FlagDef::new("--custom").short("-c").handler(move |_| {
            record(&seen, "custom");
            Ok(())
        }))
        .unwrap();

    let outcome = fx.console.process_startup(["prog", "-c", "--help"]).unwrap();

    assert_eq!(outcome, StartupOutcome::HelpShown);
    assert!(events(&fx).is_empty());
    assert_eq!(fx.console.phase(), StartupPhase::StartupDone);
    let text = fx.output.text();
    assert!(text.starts_with("usage: prog [flags]"));
    assert!(text.contains("--custom, -c"));
    assert!(text.contains("--verbose-debug, -D"));
}

#[test]
fn startup_applies_logging_before_user_flags() {
    let mut fx = fixture(ScriptedLineSource::default());
    let seen = Arc::clone(&fx.events);
    fx.console
        .terminal_add_flag(FlagDef::new("custom").short("c").handler(move |ctx| {
            record(&seen, format!("custom in {}", ctx.command_name));
            Ok(())
        }))
        .unwrap();

    let outcome = fx
        .console
        .process_startup(["prog", "--custom", "-d", "rest"])
        .unwrap();

    assert_eq!(outcome, StartupOutcome::Completed);
    assert_eq!(events(&fx), vec!["logging", "custom in terminal"]);
    assert_eq!(fx.console.program(), "prog");
    assert_eq!(fx.console.startup_args(), ["rest".to_string()]);

    let routings = fx.logging.routings.lock().unwrap();
    assert_eq!(routings.len(), 1);
    assert_eq!(routings[0].debug, LogSink::Console);
    assert_eq!(routings[0].plain, LogSink::None);
}

#[test]
fn startup_flag_values_reach_handlers() {
    let mut fx = fixture(ScriptedLineSource::default());
    let seen: Arc<Mutex<Option<FlagValue>>> = Arc::default();
    let sink = Arc::clone(&seen);
    fx.console
        .terminal_add_flag(
            FlagDef::new("ratio")
                .input(InputKind::Float)
                .handler(move |ctx| {
                    *sink.lock().unwrap() = ctx.flag_input.clone();
                    Ok(())
                }),
        )
        .unwrap();

    fx.console.process_startup(["prog", "--ratio", "0.25"]).unwrap();

    assert_eq!(*seen.lock().unwrap(), Some(FlagValue::Float(0.25)));
}

#[test]
fn startup_is_processed_once() {
    let mut fx = fixture(ScriptedLineSource::default());
    fx.console.process_startup(["prog"]).unwrap();

    assert!(matches!(
        fx.console.process_startup(["prog"]),
        Err(ConsoleError::AlreadyProcessed { .. })
    ));
    assert!(matches!(
        fx.console.terminal_add_flag(FlagDef::new("late")),
        Err(ConsoleError::AlreadyProcessed { .. })
    ));
}

#[test]
fn failed_startup_still_finishes_the_phase() {
    let mut fx = fixture(ScriptedLineSource::default());
    fx.console
        .terminal_add_flag(FlagDef::new("jobs").input(InputKind::Int))
        .unwrap();

    let err = fx.console.process_startup(["prog", "--jobs"]).unwrap_err();

    assert!(matches!(err, ConsoleError::MissingFlagInput { .. }));
    assert_eq!(fx.console.phase(), StartupPhase::StartupDone);
}

#[test]
fn quickadd_maps_short_names_by_position() {
    let mut fx = fixture(ScriptedLineSource::default());
    fx.console
        .terminal_quickadd_flags(&["test", "more"], "?m")
        .unwrap();

    let terminal = fx.console.terminal();
    assert_eq!(terminal.flag("--test").unwrap().short_name(), None);
    assert_eq!(terminal.flag("--more").unwrap().short_name(), Some("-m"));
}

#[test]
fn duplicate_command_names_are_rejected() {
    let mut fx = fixture(ScriptedLineSource::default());
    add_build(&mut fx);

    let err = fx
        .console
        .add_command("build", CommandHandler::Exit, "", "")
        .unwrap_err();
    assert!(matches!(err, ConsoleError::InvalidCommandDefinition { .. }));
}

#[test]
fn unknown_commands_are_reported_and_loop_continues() {
    let mut fx = fixture(ScriptedLineSource::from_lines(["frobnicate", "", "build"]));
    let calls = add_build(&mut fx);
    fx.console.process_startup(["prog"]).unwrap();

    fx.console.run().unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        fx.output.diagnostics(),
        vec![
            "unknown command: frobnicate",
            "hint: type `help` to list available commands",
        ]
    );
}

#[test]
fn unknown_command_has_no_hint_without_builtin_help() {
    let settings = ConsoleSettings {
        builtin_commands: Some(false),
        ..ConsoleSettings::default()
    };
    let mut fx = fixture_with(ScriptedLineSource::from_lines(["help"]), settings);
    fx.console.process_startup(["prog"]).unwrap();

    fx.console.run().unwrap();

    assert_eq!(fx.output.diagnostics(), vec!["unknown command: help"]);
}

#[test]
fn parse_and_handler_errors_do_not_stop_the_loop() {
    let mut fx = fixture(ScriptedLineSource::from_lines([
        "build -j",
        "build -j many",
        "fail",
        "build",
    ]));
    let calls = add_build(&mut fx);
    fx.console
        .add_command(
            "fail",
            CommandHandler::call(|_| Err(anyhow::anyhow!("boom"))),
            "always fails",
            "",
        )
        .unwrap();
    fx.console.process_startup(["prog"]).unwrap();

    fx.console.run().unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let diagnostics = fx.output.diagnostics();
    assert_eq!(diagnostics.len(), 3);
    assert!(diagnostics[0].contains("--jobs expects integer input"));
    assert!(diagnostics[1].contains("invalid input `many`"));
    assert_eq!(diagnostics[2], "error: handler for `fail` failed: boom");
}

#[test]
fn exit_command_ends_the_loop() {
    let mut fx = fixture(ScriptedLineSource::from_lines(["exit", "build"]));
    let calls = add_build(&mut fx);
    fx.console.process_startup(["prog"]).unwrap();

    fx.console.run().unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn help_command_lists_registered_commands() {
    let mut fx = fixture(ScriptedLineSource::from_lines(["help"]));
    add_build(&mut fx);
    fx.console.process_startup(["prog"]).unwrap();

    fx.console.run().unwrap();

    let text = fx.output.text();
    assert!(text.starts_with("commands:"));
    assert!(text.contains("build"));
    assert!(text.contains("compile the project"));
    assert!(text.find("help").unwrap() < text.find("build").unwrap());
}

#[test]
fn end_of_input_is_ignored() {
    let mut fx = fixture(ScriptedLineSource::new([
        ReadOutcome::EndOfInput,
        ReadOutcome::Line("build".to_string()),
    ]));
    let calls = add_build(&mut fx);
    fx.console.process_startup(["prog"]).unwrap();

    fx.console.run().unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn interrupt_runs_cleanup_and_aborts() {
    let mut fx = fixture(ScriptedLineSource::new([
        ReadOutcome::Interrupted,
        ReadOutcome::Line("build".to_string()),
    ]));
    let calls = add_build(&mut fx);
    let cleaned = Arc::new(AtomicUsize::new(0));
    let cleanup_counter = Arc::clone(&cleaned);
    fx.console.on_cleanup(move || {
        cleanup_counter.fetch_add(1, Ordering::SeqCst);
    });
    fx.console.process_startup(["prog"]).unwrap();

    let result = fx.console.run();

    assert!(matches!(result, Err(ConsoleError::Interrupted)));
    assert_eq!(cleaned.load(Ordering::SeqCst), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn inline_start_blocks_until_input_closes() {
    let mut fx = fixture(ScriptedLineSource::from_lines(["build", "build"]));
    let calls = add_build(&mut fx);
    fx.console.process_startup(["prog"]).unwrap();

    let handle = fx.console.start(StartMode::Inline).unwrap();

    assert!(handle.is_finished());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    handle.join().unwrap();
}

#[test]
fn cancellation_stops_background_worker_between_reads() {
    let (tx, source) = ChannelLineSource::new();
    let mut fx = fixture(source);
    let calls = add_build(&mut fx);
    fx.console.process_startup(["prog"]).unwrap();

    let handle = fx
        .console
        .start(StartMode::Background { daemon: false })
        .unwrap();

    tx.send("build".to_string()).unwrap();
    let deadline = Instant::now() + Duration::from_secs(5);
    while calls.load(Ordering::SeqCst) == 0 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    handle.cancel();
    // 취소 후 읽힌 줄은 실행되지 않는다.
    let _ = tx.send("build".to_string());
    handle.join().unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

fn wait_for_calls(calls: &AtomicUsize, expected: usize) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while calls.load(Ordering::SeqCst) < expected && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn dropping_non_daemon_handle_cancels_worker() {
    let (tx, source) = ChannelLineSource::new();
    let mut fx = fixture(source);
    let calls = add_build(&mut fx);
    fx.console.process_startup(["prog"]).unwrap();

    let handle = fx
        .console
        .start(StartMode::Background { daemon: false })
        .unwrap();
    drop(handle);

    // 워커가 끝나 수신 측이 사라질 때까지 줄을 보낸다.
    let deadline = Instant::now() + Duration::from_secs(5);
    while tx.send("build".to_string()).is_ok() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }

    assert!(tx.send("build".to_string()).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn dropping_daemon_handle_leaves_worker_running() {
    let (tx, source) = ChannelLineSource::new();
    let mut fx = fixture(source);
    let calls = add_build(&mut fx);
    fx.console.process_startup(["prog"]).unwrap();

    let handle = fx
        .console
        .start(StartMode::Background { daemon: true })
        .unwrap();
    drop(handle);

    tx.send("build".to_string()).unwrap();
    wait_for_calls(&calls, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    tx.send("exit".to_string()).unwrap();
}

#[test]
fn shutdown_discards_line_read_after_request() {
    let (tx, source) = ChannelLineSource::new();
    let mut fx = fixture(source);
    let calls = add_build(&mut fx);
    fx.console.process_startup(["prog"]).unwrap();

    let handle = fx
        .console
        .start(StartMode::Background { daemon: false })
        .unwrap();
    tx.send("build".to_string()).unwrap();
    wait_for_calls(&calls, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let late = tx.clone();
    let sender = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        let _ = late.send("build".to_string());
    });

    assert!(handle.shutdown().is_ok());
    sender.join().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn handle_interrupt_runs_cleanup_and_reports_interrupted() {
    let (tx, source) = ChannelLineSource::new();
    let mut fx = fixture(source);
    let calls = add_build(&mut fx);
    let cleanups = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&cleanups);
    fx.console.on_cleanup(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    fx.console.process_startup(["prog"]).unwrap();

    let handle = fx
        .console
        .start(StartMode::Background { daemon: false })
        .unwrap();
    handle.interrupt();
    let _ = tx.send("build".to_string());

    assert!(matches!(handle.join(), Err(ConsoleError::Interrupted)));
    assert_eq!(cleanups.load(Ordering::SeqCst), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn plain_cancel_skips_cleanup() {
    let (tx, source) = ChannelLineSource::new();
    let mut fx = fixture(source);
    let cleanups = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&cleanups);
    fx.console.on_cleanup(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    fx.console.process_startup(["prog"]).unwrap();

    let handle = fx
        .console
        .start(StartMode::Background { daemon: false })
        .unwrap();
    handle.cancel();
    let _ = tx.send("help".to_string());

    assert!(handle.join().is_ok());
    assert_eq!(cleanups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn background_worker_can_be_awaited() {
    let mut fx = fixture(ScriptedLineSource::from_lines(["build", "exit"]));
    let calls = add_build(&mut fx);
    fx.console.process_startup(["prog"]).unwrap();

    let handle = fx
        .console
        .start(StartMode::Background { daemon: true })
        .unwrap();
    assert!(handle.is_daemon());

    handle.wait().await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
