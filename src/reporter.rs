use console::{Term, style};

use crate::convert::{ConvertProgress, ConvertReporter};
use crate::helpers::emojis::*;
use crate::mapping::ControlMapping;

/// Check if we're running in a TTY (interactive terminal)
fn is_tty() -> bool {
    Term::stdout().is_term() && Term::stderr().is_term()
}

/// Format timing string, returning empty string if no_timing is true
fn timing(duration_seconds: f64, no_timing: bool) -> String {
    if no_timing {
        String::new()
    } else {
        format!(" in {:.2}s", duration_seconds)
    }
}

/// Renders conversion progress on the terminal. Plain text when not
/// attached to a TTY.
pub struct TerminalReporter {
    pub no_timing: bool,
    /// When false only warnings, errors and rendered documents are printed.
    pub show_progress: bool,
    plain_output: bool,
}

impl TerminalReporter {
    pub fn new(no_timing: bool, show_progress: bool) -> Self {
        TerminalReporter {
            no_timing,
            show_progress,
            plain_output: !is_tty(),
        }
    }
}

impl ConvertReporter for TerminalReporter {
    fn report(&self, progress: ConvertProgress) {
        match progress {
            ConvertProgress::Started { total } => {
                if !self.show_progress {
                    return;
                }
                if self.plain_output {
                    println!("Converting {total} pages");
                } else {
                    println!("{}{}Converting {} pages", LINE_CLEAR, LOOKING_GLASS, total);
                }
            }
            ConvertProgress::CodeBehindWarning { path, error } => {
                let message = format!(
                    "Could not read code-behind {} (converting without it): {}",
                    path.display(),
                    error
                );
                if self.plain_output {
                    eprintln!("{}", message);
                } else {
                    eprintln!("{}{}", WARNING, style(&message).yellow());
                }
            }
            ConvertProgress::Converted {
                input,
                output,
                fields,
                events,
            } => {
                if !self.show_progress {
                    return;
                }
                if self.plain_output {
                    println!(
                        "Converted {} -> {} ({} fields, {} events)",
                        input.display(),
                        output.display(),
                        fields,
                        events
                    );
                } else {
                    println!(
                        "{}{}{} {} {} {}",
                        LINE_CLEAR,
                        PAGE,
                        input.display(),
                        style("->").dim(),
                        output.display(),
                        style(format!("({fields} fields, {events} events)")).dim()
                    );
                }
            }
            ConvertProgress::Rendered { output, content, .. } => {
                if self.show_progress {
                    println!("{}", style(format!("// {}", output.display())).dim());
                }
                print!("{content}");
            }
            ConvertProgress::Failed(error) => {
                let message = error.to_string();
                if self.plain_output {
                    eprintln!("{}", message);
                } else {
                    eprintln!("{}{}", CROSS, style(&message).red());
                }
            }
            ConvertProgress::Finished {
                converted,
                failed,
                duration_seconds,
            } => {
                if !self.show_progress {
                    return;
                }
                let message = format!(
                    "Converted {} of {} pages{}",
                    converted,
                    converted + failed,
                    timing(duration_seconds, self.no_timing)
                );
                if self.plain_output {
                    println!("{}", message);
                } else if failed == 0 {
                    println!("{}{}{}", LINE_CLEAR, SPARKLES, style(&message).green());
                } else {
                    println!("{}{}{}", LINE_CLEAR, CROSS, style(&message).red());
                }
            }
        }
    }
}

/// Prints the control table for the `mappings` command.
pub fn print_mappings(controls: &[ControlMapping]) {
    for control in controls {
        println!("{} -> <{}>", style(control.legacy_tag).bold(), control.output_tag);
        if let Some((name, value)) = control.fixed_attribute {
            println!("    fixed    {name}=\"{value}\"");
        }
        for (from, to) in &control.attribute_renames {
            println!("    rename   {from} -> {to}");
        }
        if let Some(event) = control.event {
            println!("    event    {} -> {}", event.legacy, event.target);
        }
        println!("    binds    {}", control.binding_type);
    }
}
