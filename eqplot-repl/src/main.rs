mod command;
mod error;

use command::{Command, HELP};
use eqplot_graph::{
    analyze,
    equation_latex,
    plot_data_points,
    DataPointOptions,
    DataSeriesPlan,
    PlotOptions,
    RenderPlan,
    Title,
};
use error::Error;
use log::{info, LevelFilter};
use rustyline::{error::ReadlineError, DefaultEditor};
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};
use std::{fs::File, io::{self, BufReader, IsTerminal, Read}, path::PathBuf, str::FromStr};

/// The state kept between lines of input.
#[derive(Debug, Default)]
struct Session {
    /// The options used for every plot.
    options: PlotOptions,

    /// The PNG file plots are written to.
    #[cfg_attr(not(feature = "cairo"), allow(dead_code))]
    output: Option<PathBuf>,
}

/// Formats a number with at most 6 decimal places.
fn fmt_num(n: f64) -> String {
    let s = format!("{:.6}", n);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" => "0".to_string(),
        s => s.to_string(),
    }
}

/// Prints what was found when analyzing an equation.
fn print_plan(plan: &RenderPlan) {
    match &plan.title {
        Some(Title::Plain(title)) => println!("title: {}", title),
        Some(Title::Latex(latex)) => println!("title: ${}$", latex),
        None => (),
    }

    if !plan.holes.is_empty() {
        let holes = plan.holes.iter()
            .map(|hole| format!("({}, {})", fmt_num(hole.0), fmt_num(hole.1)))
            .collect::<Vec<_>>();
        println!("holes: {}", holes.join(", "));
    }

    if !plan.asymptote_xs.is_empty() {
        let asymptotes = plan.asymptote_xs.iter()
            .map(|&x| format!("x = {}", fmt_num(x)))
            .collect::<Vec<_>>();
        println!("asymptotes: {}", asymptotes.join(", "));
    }

    let grid = &plan.contour_source;
    let excluded = grid.mask.iter().filter(|&&masked| masked).count();
    println!(
        "curve: {} segments, {} of {} samples excluded",
        plan.contour().len(),
        excluded,
        grid.mask.len(),
    );
}

fn print_points(plan: &DataSeriesPlan) {
    let viewport = &plan.viewport;
    println!(
        "{} points in [{}, {}] × [{}, {}]",
        plan.xs.len(),
        fmt_num(viewport.x.0),
        fmt_num(viewport.x.1),
        fmt_num(viewport.y.0),
        fmt_num(viewport.y.1),
    );
}

/// Plots the equation, writing it to the output file if one is set.
#[cfg(feature = "cairo")]
fn plot(equation: &str, session: &Session) -> Result<RenderPlan, Error> {
    use eqplot_graph::{plot_equation, CairoPresenter};

    let Some(path) = &session.output else {
        return Ok(analyze(equation, &session.options)?);
    };

    let mut presenter = CairoPresenter::new(path.clone());
    let outcome = plot_equation(equation, &session.options, &mut presenter)?;
    if outcome.presented {
        println!("wrote {}", path.display());
    }
    Ok(outcome.plan)
}

#[cfg(not(feature = "cairo"))]
fn plot(equation: &str, session: &Session) -> Result<RenderPlan, Error> {
    Ok(analyze(equation, &session.options)?)
}

/// Runs a line of input, returning the text that the spans of an error point into.
fn run<'a>(line: &'a str, session: &mut Session) -> Result<(), (Error, &'a str)> {
    let command = Command::parse(line).map_err(|err| (err.into(), line))?;
    info!("running {:?}", command);

    match command {
        Command::Plot(_) => {
            let equation = line.trim();
            if equation.is_empty() {
                return Ok(());
            }
            let plan = plot(equation, session).map_err(|err| (err, equation))?;
            print_plan(&plan);
        },
        Command::Latex(equation) => {
            let trimmed = line.trim_end();
            let equation = &trimmed[trimmed.len() - equation.len()..];
            let latex = equation_latex(equation, &session.options)
                .map_err(|err| (err.into(), equation))?;
            println!("{}", latex);
        },
        Command::Points(xs, ys) => {
            let plan = plot_data_points(&xs, &ys, &DataPointOptions::default())
                .map_err(|err| (err.into(), line))?;
            print_points(&plan);
        },
        Command::Set(setting) => setting.apply(&mut session.options),
        Command::Output(path) => {
            if cfg!(not(feature = "cairo")) && path.is_some() {
                eprintln!("this build cannot write plots; rebuild with the `cairo` feature");
            }
            session.output = path;
        },
        Command::Options => println!("{:#?}", session.options),
        Command::Reset => *session = Session::default(),
        Command::Help => println!("{}", HELP),
    }

    Ok(())
}

/// Runs every line of the input, reporting the errors as they occur.
fn run_all(input: &str, session: &mut Session) {
    for line in input.lines().filter(|line| !line.trim().is_empty()) {
        if let Err((err, src)) = run(line, session) {
            err.report_to_stderr(src, session.options.exclude.as_deref());
        }
    }
}

/// Sets up logging to stderr. The level is read from `EQPLOT_LOG`, and defaults to `warn`.
fn init_logger() {
    let level = std::env::var("EQPLOT_LOG")
        .ok()
        .and_then(|level| LevelFilter::from_str(&level).ok())
        .unwrap_or(LevelFilter::Warn);

    if let Err(err) = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )]) {
        eprintln!("could not set up logging: {}", err);
    }
}

fn read_all(mut reader: impl Read) -> io::Result<String> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    Ok(input)
}

fn main() {
    init_logger();

    let mut args = std::env::args();
    args.next();

    let mut session = Session::default();

    if let Some(filename) = args.next() {
        // run the file, one line at a time
        match File::open(&filename).map(BufReader::new).and_then(read_all) {
            Ok(input) => run_all(&input, &mut session),
            Err(err) => eprintln!("could not read {}: {}", filename, err),
        }
    } else if !io::stdin().is_terminal() {
        // read lines from stdin
        match read_all(io::stdin()) {
            Ok(input) => run_all(&input, &mut session),
            Err(err) => eprintln!("could not read stdin: {}", err),
        }
    } else {
        // run the repl / interactive mode
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(err) => {
                eprintln!("{}", err);
                return;
            },
        };

        fn process_line(rl: &mut DefaultEditor, session: &mut Session) -> Result<(), ReadlineError> {
            let input = rl.readline("> ")?;
            if input.trim().is_empty() {
                return Ok(());
            }

            rl.add_history_entry(&input)?;

            run_all(&input, session);
            Ok(())
        }

        loop {
            if let Err(err) = process_line(&mut rl, &mut session) {
                match err {
                    ReadlineError::Eof | ReadlineError::Interrupted => (),
                    _ => eprintln!("{}", err),
                }
                break;
            }
        }
    }
}
