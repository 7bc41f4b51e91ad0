use std::cell::RefCell;
use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Mutex;
use std::time::Duration;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use schema_edit::core::value::Value;
use schema_edit::schema::document::load_value;
use schema_edit::terminal::{KeyCode, KeyEvent, KeyModifiers, Terminal, TerminalEvent};
use schema_edit::ui::span::{Span, SpanLine};
use schema_edit::ui::style::{Color, Style};
use schema_edit::{Handler, PathCallback, Schema, TermUi, edit, generate_default};
use similar::TextDiff;

const HELP: &str = "tab/↑↓ focus  space/enter toggle  ←/→ adjust  esc quit";

fn cli() -> Command {
    Command::new("schema-edit")
        .about("Edit a JSON/YAML document in the terminal, guided by a schema")
        .arg(
            Arg::new("schema")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Schema document (.json, .yaml or .yml)"),
        )
        .arg(
            Arg::new("data")
                .long("data")
                .value_parser(value_parser!(PathBuf))
                .help("Starting document; generated from the schema defaults when omitted"),
        )
        .arg(
            Arg::new("watch")
                .long("watch")
                .action(ArgAction::Append)
                .help("Path pattern to report changes for; `*` matches any run of characters"),
        )
        .arg(
            Arg::new("log")
                .long("log")
                .value_parser(value_parser!(PathBuf))
                .help("Write diagnostics here, filtered by RUST_LOG"),
        )
}

fn main() {
    if let Err(err) = run(cli().get_matches()) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(args: ArgMatches) -> Result<(), Box<dyn Error>> {
    if let Some(path) = args.get_one::<PathBuf>("log") {
        init_logging(path)?;
    }

    let schema_path = args
        .get_one::<PathBuf>("schema")
        .ok_or("missing schema path")?;
    let schema = Schema::load(schema_path)?;
    let mut data = match args.get_one::<PathBuf>("data") {
        Some(path) => load_value(path)?,
        None => generate_default(&schema),
    };

    let watches: Vec<String> = args
        .get_many::<String>("watch")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let hits = Rc::new(RefCell::new(Vec::new()));
    let callbacks = build_callbacks(&watches, &hits)?;

    let before = to_pretty(&data)?;
    let mut terminal = Terminal::new()?;
    terminal.enter()?;
    let result = event_loop(&mut terminal, &schema, &mut data, &callbacks, &hits);
    terminal.exit()?;
    result?;

    let after = to_pretty(&data)?;
    println!("{after}");
    if before != after {
        let diff = TextDiff::from_lines(&before, &after);
        print!("{}", diff.unified_diff().header("before", "after"));
    }
    Ok(())
}

fn init_logging(path: &PathBuf) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn build_callbacks(
    watches: &[String],
    hits: &Rc<RefCell<Vec<String>>>,
) -> Result<Vec<PathCallback>, Box<dyn Error>> {
    let mut callbacks = vec![PathCallback::any(Handler::change(|path, old, new| {
        tracing::info!(path, old = %json(old), new = %json(new), "value changed");
    }))];
    for pattern in watches {
        let sink = Rc::clone(hits);
        let callback = PathCallback::new(
            [pattern.as_str()],
            Handler::change(move |path, old, new| {
                sink.borrow_mut()
                    .push(format!("{path}: {} -> {}", json(old), json(new)));
            }),
        )?;
        callbacks.push(callback);
    }
    Ok(callbacks)
}

fn event_loop(
    terminal: &mut Terminal,
    schema: &Schema,
    data: &mut Value,
    callbacks: &[PathCallback],
    hits: &Rc<RefCell<Vec<String>>>,
) -> Result<(), Box<dyn Error>> {
    let label = schema.label_or("document").to_string();
    let mut ui = TermUi::new(terminal.size().width as usize);
    let mut scroll = 0usize;
    let mut key: Option<KeyEvent> = None;
    let mut render_requested = true;

    loop {
        if render_requested {
            let size = terminal.size();
            ui.begin_frame(size.width as usize, key.take());
            edit(&mut ui, &label, data, Some(schema), callbacks);
            ui.end_frame();

            let footer = footer(hits);
            let rows = (size.height as usize).saturating_sub(footer.len());
            scroll = keep_visible(scroll, ui.focused_line(), rows);
            terminal.draw(ui.lines(), scroll, &footer)?;
            render_requested = false;
        }

        if terminal.poll(Duration::from_millis(100))? {
            match terminal.read_event()? {
                TerminalEvent::Key(event) => {
                    if is_quit(&event) {
                        break;
                    }
                    key = Some(event);
                    render_requested = true;
                }
                TerminalEvent::Resize { .. } => {
                    render_requested = true;
                }
            }
        }
    }

    Ok(())
}

fn is_quit(event: &KeyEvent) -> bool {
    event.code == KeyCode::Esc
        || (event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL))
}

fn footer(hits: &Rc<RefCell<Vec<String>>>) -> Vec<SpanLine> {
    let dim = Style::new().color(Color::DarkGrey);
    let mut lines = Vec::with_capacity(2);
    if let Some(last) = hits.borrow().last() {
        lines.push(vec![Span::styled(last.clone(), Style::new().color(Color::Yellow))]);
    }
    lines.push(vec![Span::styled(HELP, dim)]);
    lines
}

/// Adjusts `scroll` so `focused` stays within `rows` visible lines.
fn keep_visible(scroll: usize, focused: Option<usize>, rows: usize) -> usize {
    let Some(line) = focused else {
        return scroll;
    };
    if rows == 0 {
        return line;
    }
    if line < scroll {
        line
    } else if line >= scroll + rows {
        line + 1 - rows
    } else {
        scroll
    }
}

fn json(value: &Value) -> serde_json::Value {
    serde_json::Value::from(value)
}

fn to_pretty(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::{cli, keep_visible};

    #[test]
    fn scroll_follows_focus() {
        assert_eq!(keep_visible(0, Some(3), 10), 0);
        assert_eq!(keep_visible(0, Some(12), 10), 3);
        assert_eq!(keep_visible(5, Some(2), 10), 2);
        assert_eq!(keep_visible(4, None, 10), 4);
    }

    #[test]
    fn watch_is_repeatable() {
        let args = cli()
            .try_get_matches_from(["schema-edit", "s.json", "--watch", "a/*", "--watch", "b"])
            .expect("args");
        let watches: Vec<&String> = args.get_many::<String>("watch").expect("watch").collect();
        assert_eq!(watches, vec!["a/*", "b"]);
    }
}
