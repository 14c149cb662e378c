use crate::error::{InvalidArgument, UnknownCommand};
use eqplot_error::Error;
use eqplot_graph::PlotOptions;
use std::{mem, ops::Range, path::PathBuf};

/// A change to the options used for every following plot.
#[derive(Clone, Debug, PartialEq)]
pub enum Setting {
    Exclude(Option<String>),
    XLim(f64, f64),
    YLim(f64, f64),
    Resolution(usize),
    Tolerance(f64),
    AutoExclude(bool),
    LatexTitle(bool),
    DisplayLatex(bool),
    ShowAxes(bool),
    EqualAspect(bool),
    Title(Option<String>),
    Symbols(String, String),
}

impl Setting {
    /// Applies the setting to the given options.
    pub fn apply(self, options: &mut PlotOptions) {
        let current = mem::take(options);
        *options = match self {
            Self::Exclude(Some(exclude)) => current.exclude(exclude),
            Self::Exclude(None) => PlotOptions { exclude: None, ..current },
            Self::XLim(min, max) => current.xlim(min, max),
            Self::YLim(min, max) => current.ylim(min, max),
            Self::Resolution(resolution) => current.resolution(resolution),
            Self::Tolerance(tolerance) => current.tolerance(tolerance),
            Self::AutoExclude(on) => current.auto_exclude(on),
            Self::LatexTitle(on) => current.latex_title(on),
            Self::DisplayLatex(on) => current.display_latex(on),
            Self::ShowAxes(on) => current.show_axes(on),
            Self::EqualAspect(on) => current.equal_aspect(on),
            Self::Title(Some(title)) => current.title(title),
            Self::Title(None) => PlotOptions { title: None, ..current },
            Self::Symbols(x, y) => current.symbols(x, y),
        };
    }
}

/// A line of input to the REPL.
///
/// Lines starting with `:` are commands. Every other line is an equation to plot.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Plot the equation.
    Plot(String),

    /// Print the equation in LaTeX.
    Latex(String),

    /// Plot discrete `(x, y)` data points.
    Points(Vec<f64>, Vec<f64>),

    /// Change an option.
    Set(Setting),

    /// Write every following plot to this PNG file, or stop writing plots if [`None`].
    Output(Option<PathBuf>),

    /// Print the current options.
    Options,

    /// Restore the default options.
    Reset,

    /// Print the list of commands.
    Help,
}

/// Splits the line into whitespace-separated words, keeping the span of each word.
fn words(line: &str) -> Vec<(Range<usize>, &str)> {
    let mut words = Vec::new();
    let mut start = None;
    for (i, c) in line.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                words.push((s..i, &line[s..i]));
                start = None;
            },
            (false, None) => start = Some(i),
            _ => (),
        }
    }
    if let Some(s) = start {
        words.push((s..line.len(), &line[s..]));
    }
    words
}

fn invalid(span: Range<usize>, expected: &'static str) -> Error {
    Error::new(vec![span], InvalidArgument { expected })
}

fn number(word: &(Range<usize>, &str)) -> Result<f64, Error> {
    word.1.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| invalid(word.0.clone(), "a number"))
}

fn switch(word: &(Range<usize>, &str)) -> Result<bool, Error> {
    match word.1 {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => Err(invalid(word.0.clone(), "`on` or `off`")),
    }
}

/// Returns the argument words, or an error pointing at the command name if there are not exactly
/// `count` of them.
fn exactly<'a, 'b>(
    name: &Range<usize>,
    args: &'b [(Range<usize>, &'a str)],
    count: usize,
    expected: &'static str,
) -> Result<&'b [(Range<usize>, &'a str)], Error> {
    if args.len() == count {
        Ok(args)
    } else {
        let span = args.get(count).map(|(span, _)| span.clone()).unwrap_or_else(|| name.clone());
        Err(invalid(span, expected))
    }
}

/// Parses a `x,y` data point.
fn point(word: &(Range<usize>, &str)) -> Result<(f64, f64), Error> {
    let (x, y) = word.1.split_once(',').ok_or_else(|| invalid(word.0.clone(), "a point `x,y`"))?;
    match (x.parse::<f64>(), y.parse::<f64>()) {
        (Ok(x), Ok(y)) if x.is_finite() && y.is_finite() => Ok((x, y)),
        _ => Err(invalid(word.0.clone(), "a point `x,y`")),
    }
}

impl Command {
    /// Parses a line of input.
    ///
    /// The spans of a returned error point into `line`.
    pub fn parse(line: &str) -> Result<Self, Error> {
        let trimmed = line.trim();
        if !trimmed.starts_with(':') {
            return Ok(Self::Plot(trimmed.to_string()));
        }

        let all = words(line);
        let Some((name_span, name)) = all.first() else {
            return Ok(Self::Plot(String::new()));
        };
        let name = &name[1..];
        let args = &all[1..];
        let rest = line[name_span.end..].trim();

        // an argument that is the rest of the line, where `none` or nothing clears it
        let optional_rest = || match rest {
            "" | "none" => None,
            rest => Some(rest.to_string()),
        };

        let command = match name {
            "help" => Self::Help,
            "options" => Self::Options,
            "reset" => Self::Reset,
            "latex" => {
                if rest.is_empty() {
                    return Err(invalid(name_span.clone(), "an equation"));
                }
                Self::Latex(rest.to_string())
            },
            "points" => {
                if args.is_empty() {
                    return Err(invalid(name_span.clone(), "at least one point `x,y`"));
                }
                let (xs, ys) = args.iter()
                    .map(point)
                    .collect::<Result<Vec<_>, _>>()?
                    .into_iter()
                    .unzip();
                Self::Points(xs, ys)
            },
            "out" => Self::Output(optional_rest().map(PathBuf::from)),
            "exclude" => Self::Set(Setting::Exclude(optional_rest())),
            "title" => Self::Set(Setting::Title(optional_rest())),
            "xlim" | "ylim" => {
                let args = exactly(name_span, args, 2, "two bounds")?;
                let (min, max) = (number(&args[0])?, number(&args[1])?);
                if name == "xlim" {
                    Self::Set(Setting::XLim(min, max))
                } else {
                    Self::Set(Setting::YLim(min, max))
                }
            },
            "res" | "resolution" => {
                let args = exactly(name_span, args, 1, "a number of samples")?;
                let resolution = args[0].1.parse::<usize>()
                    .map_err(|_| invalid(args[0].0.clone(), "a number of samples"))?;
                Self::Set(Setting::Resolution(resolution))
            },
            "tol" | "tolerance" => {
                let args = exactly(name_span, args, 1, "a number")?;
                Self::Set(Setting::Tolerance(number(&args[0])?))
            },
            "vars" => {
                let args = exactly(name_span, args, 2, "two variable names")?;
                Self::Set(Setting::Symbols(args[0].1.to_string(), args[1].1.to_string()))
            },
            "auto" | "latex-title" | "display-latex" | "axes" | "equal" => {
                let args = exactly(name_span, args, 1, "`on` or `off`")?;
                let on = switch(&args[0])?;
                Self::Set(match name {
                    "auto" => Setting::AutoExclude(on),
                    "latex-title" => Setting::LatexTitle(on),
                    "display-latex" => Setting::DisplayLatex(on),
                    "axes" => Setting::ShowAxes(on),
                    _ => Setting::EqualAspect(on),
                })
            },
            _ => {
                return Err(Error::new(
                    vec![name_span.clone()],
                    UnknownCommand { name: name.to_string() },
                ));
            },
        };
        Ok(command)
    }
}

/// The text printed by `:help`.
pub const HELP: &str = "\
enter an equation to plot it, such as `y = x^2`, `f(x) = 1/(x-3)`, or `2xy + 5y^2 = 4`

commands:
  :latex <equation>            print the equation in LaTeX
  :points <x,y> ...            plot discrete data points
  :exclude <condition | none>  exclude the points where the condition holds
  :xlim <min> <max>            set the bounds of the horizontal axis
  :ylim <min> <max>            set the bounds of the vertical axis
  :res <n>                     set the number of samples along each axis
  :tol <tolerance>             set how close to a singularity points are excluded
  :vars <x> <y>                set the names of the variables
  :auto <on | off>             find and exclude singularities automatically
  :latex-title <on | off>      title the plot with its equation
  :display-latex <on | off>    display the equation separately from the plot
  :axes <on | off>             draw the coordinate axes
  :equal <on | off>            use the same scale on both axes
  :title <title | none>        set the title of the plot
  :out <file.png | none>       write every plot to a PNG file
  :options                     print the current options
  :reset                       restore the default options
  :help                        print this message";

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn equation() {
        assert_eq!(Command::parse("  y = x^2 ").unwrap(), Command::Plot("y = x^2".to_string()));
    }

    #[test]
    fn bounds() {
        assert_eq!(Command::parse(":xlim -2 2.5").unwrap(), Command::Set(Setting::XLim(-2.0, 2.5)));
        assert_eq!(Command::parse(":ylim 0 1").unwrap(), Command::Set(Setting::YLim(0.0, 1.0)));

        let err = Command::parse(":xlim -2").unwrap_err();
        assert_eq!(err.spans, vec![0..5]);

        let err = Command::parse(":ylim 0 one").unwrap_err();
        assert_eq!(err.spans, vec![8..11]);
    }

    #[test]
    fn clearing_arguments() {
        assert_eq!(
            Command::parse(":exclude abs(x) < 0.5").unwrap(),
            Command::Set(Setting::Exclude(Some("abs(x) < 0.5".to_string()))),
        );
        assert_eq!(Command::parse(":exclude none").unwrap(), Command::Set(Setting::Exclude(None)));
        assert_eq!(Command::parse(":title").unwrap(), Command::Set(Setting::Title(None)));
        assert_eq!(Command::parse(":out plot.png").unwrap(), Command::Output(Some(PathBuf::from("plot.png"))));
    }

    #[test]
    fn switches() {
        assert_eq!(Command::parse(":auto off").unwrap(), Command::Set(Setting::AutoExclude(false)));
        assert_eq!(Command::parse(":equal on").unwrap(), Command::Set(Setting::EqualAspect(true)));
        assert!(Command::parse(":axes maybe").is_err());
    }

    #[test]
    fn points() {
        assert_eq!(
            Command::parse(":points 0,0 1,1 2,4").unwrap(),
            Command::Points(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 4.0]),
        );
        let err = Command::parse(":points 0,0 1").unwrap_err();
        assert_eq!(err.spans, vec![12..13]);
    }

    #[test]
    fn unknown_command() {
        let err = Command::parse(":plot y = x").unwrap_err();
        assert_eq!(err.spans, vec![0..5]);
    }

    #[test]
    fn settings_apply() {
        let mut options = PlotOptions::default();
        Setting::Resolution(50).apply(&mut options);
        Setting::Exclude(Some("x > 0".to_string())).apply(&mut options);
        Setting::Symbols("t".to_string(), "v".to_string()).apply(&mut options);
        assert_eq!(options.resolution, 50);
        assert_eq!(options.exclude.as_deref(), Some("x > 0"));
        assert_eq!((options.x_symbol.as_str(), options.y_symbol.as_str()), ("t", "v"));

        Setting::Exclude(None).apply(&mut options);
        assert_eq!(options.exclude, None);
    }
}
