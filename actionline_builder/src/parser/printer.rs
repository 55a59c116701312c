use terminal_size::{terminal_size, Width};

use crate::api::{ActionSpec, OptionKind};
use crate::parser::interface::UserInterface;

/// The usage line for one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ActionUsage {
    name: String,
    synopsis: String,
    about: Option<String>,
}

impl ActionUsage {
    /// Describe the action registered under `name` (`None` for the default action).
    pub(crate) fn new(name: Option<&str>, spec: &ActionSpec) -> Self {
        let mut grammars = Vec::default();

        for (parameter, option) in spec.options() {
            let value = match option.kind() {
                OptionKind::Flag | OptionKind::Count => "".to_string(),
                OptionKind::Key(_) => format!(
                    " {}",
                    parameter.to_ascii_uppercase().replace('-', "_")
                ),
            };

            match (option.short(), option.long()) {
                (Some(s), _) => grammars.push(format!("[-{s}{value}]")),
                (None, Some(l)) => grammars.push(format!("[--{l}{value}]")),
                (None, None) => unreachable!("internal error - an option must have a name"),
            }
        }

        for argument in spec.arguments() {
            let name_example = argument.name().to_ascii_uppercase().replace('-', "_");

            if argument.required() {
                grammars.push(name_example);
            } else {
                grammars.push(format!("[{name_example}]"));
            }
        }

        if spec.is_variadic() {
            grammars.push("[...]".to_string());
        }

        Self {
            name: name.unwrap_or(DEFAULT_NAME).to_string(),
            synopsis: grammars.join(" "),
            about: spec.about_message().map(str::to_string),
        }
    }
}

pub(crate) struct Printer {
    program: String,
    actions: Vec<ActionUsage>,
    terminal_width: Option<usize>,
}

const DEFAULT_NAME: &str = "(default)";
const FALLBACK_WIDTH: usize = 80;
// Let's assume the average word length is 5.
// Then 17 is a good minimum, because it allows precisely 3 words with a space between them.
const MINIMUM_MIDDLE_WIDTH: usize = 17;
const PADDING_WIDTH: usize = 3;
const MAIN_INDENT: usize = 1;

impl Printer {
    pub(crate) fn terminal(program: impl Into<String>, actions: Vec<ActionUsage>) -> Self {
        let terminal_width = if let Some((Width(terminal_width), _)) = terminal_size() {
            Some(terminal_width as usize)
        } else {
            None
        };

        Self::new(program, actions, terminal_width)
    }

    pub(crate) fn new(
        program: impl Into<String>,
        actions: Vec<ActionUsage>,
        terminal_width: Option<usize>,
    ) -> Self {
        Self {
            program: program.into(),
            actions,
            terminal_width,
        }
    }

    /// Render the usage text, one line per element.
    ///
    /// Each action occupies a left column with its name, followed by its synopsis and description wrapped into the middle column.
    pub(crate) fn render(&self) -> Vec<String> {
        let mut out = vec![format!("usage: {} ACTION [...]", self.program)];

        if self.actions.is_empty() {
            return out;
        }

        let left_column_width = self
            .actions
            .iter()
            .map(|a| a.name.chars().count())
            .max()
            .unwrap_or(0);
        let total_width = self.terminal_width.unwrap_or(FALLBACK_WIDTH);
        let non_middle = MAIN_INDENT + left_column_width + PADDING_WIDTH;
        let middle_column_width = if non_middle + MINIMUM_MIDDLE_WIDTH < total_width {
            total_width - non_middle
        } else {
            MINIMUM_MIDDLE_WIDTH
        };
        let padding = " ".repeat(PADDING_WIDTH);
        let indent = MAIN_INDENT;

        out.push("".to_string());
        out.push("actions:".to_string());

        for ActionUsage {
            name,
            synopsis,
            about,
        } in &self.actions
        {
            let mut middle = chunk(synopsis, middle_column_width);

            if let Some(about) = about {
                middle.extend(chunk(about, middle_column_width));
            }

            if middle.is_empty() {
                out.push(format!("{:indent$}{name}", ""));
                continue;
            }

            for (i, part) in middle.iter().enumerate() {
                let left = if i == 0 { name.as_str() } else { "" };
                out.push(format!(
                    "{:indent$}{left:left_column_width$}{padding}{part}",
                    ""
                ));
            }
        }

        out
    }

    pub(crate) fn print_usage(&self, user_interface: &(impl UserInterface + ?Sized)) {
        for line in self.render() {
            user_interface.print(line);
        }
    }
}

fn chunk(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split(' ') {
        if word.is_empty() {
            continue;
        }

        let word_width = word.chars().count();

        if current.is_empty() {
            hyphenate(width, &mut lines, &mut current, word);
        } else if current.chars().count() + word_width + 1 <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            hyphenate(width, &mut lines, &mut current, word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn hyphenate(width: usize, lines: &mut Vec<String>, current: &mut String, word: &str) {
    let characters: Vec<char> = word.chars().collect();
    let increment = width - 1;
    let mut left = 0;

    while characters.len() - left > width {
        let piece: String = characters[left..left + increment].iter().collect();
        lines.push(format!("{piece}-"));
        left += increment;
    }

    current.extend(&characters[left..]);
}
