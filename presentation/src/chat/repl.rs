//! REPL (Read-Eval-Print Loop) for interactive use.
//!
//! Each line runs through the pipeline at confirmation level 0; when the
//! outcome is `ConfirmationRequired`, the user is asked inline and the
//! line is re-run at the required level. Chat intents are answered through
//! the chat gateway.

use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};

use herald_application::ports::chat_gateway::ChatGateway;
use herald_application::ports::resolver_backend::ResolveContext;
use herald_application::{Pipeline, PipelineOutcome};

use crate::ConsoleFormatter;

const SYSTEM_PROMPT: &str = "Ты локальный офлайн-ассистент. Отвечай кратко, по-русски. \
                             Не придумывай факты. Если не уверен — 'Не знаю'.";

/// Interactive REPL over the pipeline.
pub struct Repl {
    pipeline: Pipeline,
    context: ResolveContext,
    chat: Option<Arc<dyn ChatGateway>>,
    show_progress: bool,
}

impl Repl {
    pub fn new(pipeline: Pipeline, context: ResolveContext) -> Self {
        Self {
            pipeline,
            context,
            chat: None,
            show_progress: true,
        }
    }

    pub fn with_chat_gateway(mut self, chat: Arc<dyn ChatGateway>) -> Self {
        self.chat = Some(chat);
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run the interactive loop until EOF or `/quit`.
    pub async fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = dirs::data_dir().map(|p| p.join("herald").join("history.txt"));
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            let readline = rl.readline(">>> ");
            match readline {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if line.starts_with('/') {
                        if self.handle_command(line) {
                            break;
                        }
                        continue;
                    }
                    let _ = rl.add_history_entry(line);
                    self.process_line(&mut rl, line).await?;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Пока!");
                    break;
                }
                Err(err) => {
                    println!("Ошибка ввода: {err:?}");
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }
        Ok(())
    }

    fn print_welcome(&self) {
        println!("herald — скажи, что сделать, или просто поговори.");
        println!("Команды: /help, /quit\n");
    }

    /// Returns true when the loop should stop.
    fn handle_command(&self, line: &str) -> bool {
        match line {
            "/quit" | "/exit" | "/q" => true,
            "/help" => {
                println!("Примеры: 'прочитай файл notes.txt', 'файлы *.md',");
                println!("'создай файл план.txt с содержимым черновик'.");
                println!("/quit — выход.");
                false
            }
            other => {
                println!("Неизвестная команда: {other}");
                false
            }
        }
    }

    async fn process_line(&self, rl: &mut DefaultEditor, line: &str) -> RlResult<()> {
        let outcome = self.handle_with_spinner(line, 0).await;

        match outcome {
            PipelineOutcome::Chat { .. } => {
                let reply = self.chat_reply(line).await;
                println!("{reply}\n");
            }
            PipelineOutcome::ConfirmationRequired { required_level, .. } => {
                println!("{}", ConsoleFormatter::format(&outcome));
                let answer = rl.readline("выполнить? [y/N] ")?;
                if matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "да" | "д") {
                    let confirmed = self.handle_with_spinner(line, required_level).await;
                    println!("{}\n", ConsoleFormatter::format(&confirmed));
                } else {
                    println!("отменено\n");
                }
            }
            other => {
                println!("{}\n", ConsoleFormatter::format(&other));
            }
        }
        Ok(())
    }

    async fn handle_with_spinner(&self, line: &str, level: u8) -> PipelineOutcome {
        let spinner = self.spinner();
        let outcome = self.pipeline.handle(line, &self.context, level).await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        outcome
    }

    fn spinner(&self) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}").unwrap_or(ProgressStyle::default_spinner()),
        );
        spinner.set_message("думаю...");
        spinner.enable_steady_tick(Duration::from_millis(120));
        Some(spinner)
    }

    async fn chat_reply(&self, text: &str) -> String {
        let Some(chat) = &self.chat else {
            return "Не знаю".to_string();
        };
        let prompt = format!("{SYSTEM_PROMPT}\n\nПользователь: {text}\nАссистент:");
        match chat.complete(&prompt).await {
            Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
            _ => "Не знаю".to_string(),
        }
    }
}
