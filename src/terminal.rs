use crossterm::style::{Color, Stylize};
use std::io::{self, BufRead, IsTerminal, Write};

const USER_PROMPT: &str = "\nUser: ";
const RETRY_MESSAGE: &str = "Please enter your response";
const BORDER_COLOR: Color = Color::AnsiValue(63);

/// Source of free-text feedback from the operator
pub trait FeedbackReader {
    /// Block until a non-blank line arrives. End of input is an error.
    fn read_line(&mut self) -> io::Result<String>;
}

/// Shows candidate messages to the operator
pub trait CandidateRenderer {
    fn render(&mut self, candidate: &str);
}

/// Line reader over any buffered input, prompting on `output`
pub struct PromptReader<R, W> {
    input: R,
    output: W,
    colored: bool,
}

impl PromptReader<io::StdinLock<'static>, io::Stdout> {
    pub fn stdin() -> Self {
        let output = io::stdout();
        let colored = output.is_terminal();
        Self {
            colored,
            ..Self::new(io::stdin().lock(), output)
        }
    }
}

impl<R: BufRead, W: Write> PromptReader<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            colored: false,
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    fn prompt(&mut self) -> io::Result<()> {
        write!(self.output, "{}", USER_PROMPT)?;
        self.output.flush()
    }
}

impl<R: BufRead, W: Write> FeedbackReader for PromptReader<R, W> {
    fn read_line(&mut self) -> io::Result<String> {
        self.prompt()?;

        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input closed before a response was entered",
                ));
            }

            if !line.trim().is_empty() {
                return Ok(strip_line_ending(line));
            }

            writeln!(self.output, "{}", render_box(RETRY_MESSAGE, self.colored))?;
            self.prompt()?;
        }
    }
}

/// Prints each candidate in a bordered block on stdout
pub struct BoxRenderer {
    colored: bool,
}

impl BoxRenderer {
    pub fn stdout() -> Self {
        Self {
            colored: io::stdout().is_terminal(),
        }
    }
}

impl CandidateRenderer for BoxRenderer {
    fn render(&mut self, candidate: &str) {
        println!("{}", render_box(candidate, self.colored));
    }
}

fn strip_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

/// Draw `text` inside a single-line border, padded one row and two columns
pub fn render_box(text: &str, colored: bool) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let width = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);

    let paint = |s: String| {
        if colored {
            s.with(BORDER_COLOR).to_string()
        } else {
            s
        }
    };
    let side = paint("│".to_string());
    let inner = width + 4;

    let mut out = Vec::with_capacity(lines.len() + 4);
    out.push(paint(format!("┌{}┐", "─".repeat(inner))));
    out.push(format!("{}{}{}", side, " ".repeat(inner), side));
    for line in &lines {
        let pad = width - line.chars().count();
        out.push(format!("{}  {}{}  {}", side, line, " ".repeat(pad), side));
    }
    out.push(format!("{}{}{}", side, " ".repeat(inner), side));
    out.push(paint(format!("└{}┘", "─".repeat(inner))));

    out.join("\n")
}
