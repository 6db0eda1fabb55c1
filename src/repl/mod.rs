//! Interactive session
//!
//! Input lines are executed unscoped against one long-lived interpreter, so
//! declarations persist across lines. After each line the operand stack is
//! shown in source-shaped form.

use crate::error::report_error;
use crate::interp::Interpreter;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;

const PROMPT: &str = "> ";
const HISTORY_FILE: &str = ".skein_history";

/// REPL state
pub struct Repl {
    editor: DefaultEditor,
    interpreter: Interpreter,
    history_path: Option<PathBuf>,
}

impl Repl {
    /// Create a new REPL
    pub fn new() -> RlResult<Self> {
        let editor = DefaultEditor::new()?;
        let interpreter = Interpreter::new();

        let history_path = dirs_home().map(|h| h.join(HISTORY_FILE));

        let mut repl = Repl {
            editor,
            interpreter,
            history_path,
        };

        if let Some(ref path) = repl.history_path {
            let _ = repl.editor.load_history(path);
        }

        Ok(repl)
    }

    /// Run the REPL
    pub fn run(&mut self) -> RlResult<()> {
        println!("skein REPL");
        println!("Type :help for help, :quit to exit.\n");

        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    let _ = self.editor.add_history_entry(line);

                    // Only known commands are intercepted; `:foo` is still a
                    // quoted-identifier literal
                    if is_command(line) {
                        if self.handle_command(line) {
                            break;
                        }
                        continue;
                    }

                    self.eval_line(line);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {err}");
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path {
            let _ = self.editor.save_history(path);
        }

        Ok(())
    }

    /// Handle REPL commands (starting with :). Returns true to exit.
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            ":quit" | ":q" | ":exit" => {
                println!("Goodbye!");
                true
            }
            ":help" | ":h" | ":?" => {
                self.print_help();
                false
            }
            ":stack" => {
                self.print_stack();
                false
            }
            ":reset" => {
                self.interpreter = Interpreter::new();
                println!("Interpreter reset.");
                false
            }
            ":clear" => {
                print!("\x1B[2J\x1B[1;1H");
                false
            }
            _ => {
                println!("Unknown command: {cmd}");
                println!("Type :help for help.");
                false
            }
        }
    }

    fn print_help(&self) {
        println!("skein REPL Commands:");
        println!("  :help, :h, :?   Show this help");
        println!("  :quit, :q       Exit the REPL");
        println!("  :stack          Show the operand stack");
        println!("  :reset          Discard the stack and all declarations");
        println!("  :clear          Clear the screen");
        println!();
        println!("Everything else is executed as a program, e.g.:");
        println!("  1 2 +                 push 1 and 2, add them");
        println!("  [2 *] =>double        declare an operation");
        println!("  21 double             call it");
        println!("  5 ->x x x *           store and retrieve a value");
    }

    fn print_stack(&self) {
        let rendered: Vec<String> = self
            .interpreter
            .stack()
            .iter()
            .map(|v| v.repr(self.interpreter.interner()))
            .collect();
        println!("stack: {}", rendered.join(" "));
    }

    /// Parse and execute one input line
    fn eval_line(&mut self, line: &str) {
        let program = match self.interpreter.parse_source(line) {
            Ok(program) => program,
            Err(err) => {
                report_error("<repl>", line, &err);
                return;
            }
        };

        // Unscoped, so declarations survive into the next line
        match self.interpreter.exec_list(program, false) {
            Ok(()) => self.print_stack(),
            Err(err) => eprintln!("Runtime error: {err}"),
        }
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new().expect("Failed to create REPL")
    }
}

const COMMANDS: &[&str] = &[
    ":quit", ":q", ":exit", ":help", ":h", ":?", ":stack", ":reset", ":clear",
];

fn is_command(line: &str) -> bool {
    COMMANDS.contains(&line)
}

/// Get home directory
fn dirs_home() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}
