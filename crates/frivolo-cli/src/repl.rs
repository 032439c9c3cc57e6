//! Interactive session: profile wizard followed by the calculator prompt.

use anyhow::Result;
use colored::Colorize;
use frivolo_application::{
    FlowController, FlowState, HistoryState, ProfileWizard, SearchHistory, WizardOutcome,
};
use frivolo_core::error::FrivoloError;
use frivolo_core::user::ProfileField;
use frivolo_core::wage::format_mxn;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tracing::debug;

use crate::backend::BackendMode;
use crate::command::Command;
use crate::helper::{CliHelper, Completions};
use crate::render;

/// What a single prompt produced.
enum Input {
    Line(String),
    /// Ctrl-C: abandon the current prompt.
    Interrupted,
    /// Ctrl-D or a read error: leave the program.
    Eof,
}

/// What the user chose while filling a wizard step.
enum StepAction {
    Submit,
    Back,
    Cancel,
    Quit,
}

pub struct Repl {
    rl: Editor<CliHelper, DefaultHistory>,
    flow: FlowController,
    mode: BackendMode,
    history: Option<SearchHistory>,
}

impl Repl {
    pub fn new(flow: FlowController, mode: BackendMode) -> Result<Self> {
        let mut rl = Editor::new()?;
        rl.set_helper(Some(CliHelper::new()));
        Ok(Self {
            rl,
            flow,
            mode,
            history: None,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        println!("{}", "=== Frivolo ===".bright_magenta().bold());
        println!("{}", "¿Cuántas horas de trabajo cuesta realmente?".bright_black());
        if !self.mode.is_remote() {
            println!(
                "{}",
                format!("Backend: {}. Tus búsquedas no se conservarán.", self.mode).yellow()
            );
        }
        println!();

        self.flow.start()?;

        loop {
            let keep_going = match self.flow.state() {
                FlowState::AwaitingProfile | FlowState::EditingProfile => self.run_wizard().await?,
                FlowState::ViewingCalculator => self.run_calculator_prompt().await?,
                FlowState::Uninitialized => false,
            };
            if !keep_going {
                break;
            }
        }

        println!("{}", "¡Hasta luego!".bright_green());
        Ok(())
    }

    fn read(&mut self, prompt: &str, initial: &str, completions: Completions) -> Input {
        if let Some(helper) = self.rl.helper_mut() {
            helper.set_completions(completions);
        }
        match self.rl.readline_with_initial(prompt, (initial, "")) {
            Ok(line) => Input::Line(line),
            Err(ReadlineError::Interrupted) => Input::Interrupted,
            Err(ReadlineError::Eof) => Input::Eof,
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                Input::Eof
            }
        }
    }

    // ===== Wizard =====

    /// Walks the current wizard step. Returns false when the user quits.
    async fn run_wizard(&mut self) -> Result<bool> {
        let Some(wizard) = self.flow.wizard() else {
            return Ok(false);
        };
        let editing = self.flow.state() == FlowState::EditingProfile;
        let step = wizard.step();

        println!("{}", render::wizard_header(wizard).bright_magenta());
        if editing {
            println!("{}", "  (/cancel para descartar los cambios)".bright_black());
        }
        if step.index() > 0 {
            println!("{}", "  (/back para volver al paso anterior)".bright_black());
        }

        match self.fill_step(step.fields()) {
            StepAction::Quit => return Ok(false),
            StepAction::Back => {
                if let Some(wizard) = self.flow.wizard_mut() {
                    wizard.previous();
                }
                return Ok(true);
            }
            StepAction::Cancel => {
                if editing {
                    match self.flow.cancel_edit() {
                        Ok(()) => println!("{}", "Cambios descartados.".bright_black()),
                        Err(e) => print_failure("No se pudieron descartar los cambios", &e),
                    }
                } else {
                    println!("{}", "Necesitamos tu perfil para calcular.".yellow());
                }
                return Ok(true);
            }
            StepAction::Submit => {}
        }

        match self.flow.advance_wizard().await {
            Ok(WizardOutcome::Advanced(_)) => {}
            Ok(WizardOutcome::Complete(profile)) => {
                println!();
                println!("{}", format!("¡Listo, {}!", profile.name).bright_green());
                for line in render::profile_lines(&profile, self.flow.hourly_wage()) {
                    println!("{}", line);
                }
                println!("{}", "Escribe un precio para empezar, o /help.".bright_black());
            }
            Err(FrivoloError::Validation(e)) => {
                println!("{}", format!("{}: {}", e.field.label(), e.reason).red());
            }
            Err(e) => {
                println!(
                    "{}",
                    format!("No pudimos guardar tu perfil ({}). Inténtalo de nuevo.", e).red()
                );
            }
        }
        println!();
        Ok(true)
    }

    fn fill_step(&mut self, fields: &[ProfileField]) -> StepAction {
        for field in fields {
            let current = self
                .flow
                .wizard()
                .and_then(|w| w.value(*field))
                .unwrap_or_default()
                .to_string();

            let completions = if *field == ProfileField::Job {
                let suggestions = ProfileWizard::job_suggestions("");
                println!("{}", format!("  Sugerencias: {}", suggestions.join(", ")).bright_black());
                Completions::Choices(suggestions.into_iter().map(str::to_string).collect())
            } else {
                Completions::None
            };

            let prompt = format!("{} [{}]: ", field.label(), field.placeholder());
            let line = match self.read(&prompt, &current, completions) {
                Input::Line(line) => line,
                Input::Interrupted => return StepAction::Cancel,
                Input::Eof => return StepAction::Quit,
            };

            match line.trim() {
                "/back" => return StepAction::Back,
                "/cancel" => return StepAction::Cancel,
                "/quit" => return StepAction::Quit,
                value => {
                    if let Some(wizard) = self.flow.wizard_mut() {
                        wizard.set(*field, value);
                    }
                }
            }
        }
        StepAction::Submit
    }

    // ===== Calculator =====

    async fn run_calculator_prompt(&mut self) -> Result<bool> {
        let line = match self.read("💸 ", "", Completions::Commands) {
            Input::Line(line) => line,
            Input::Interrupted => {
                println!("{}", "CTRL-C detectado. Escribe /quit para salir.".yellow());
                return Ok(true);
            }
            Input::Eof => return Ok(false),
        };

        let Some(command) = Command::parse(&line) else {
            return Ok(true);
        };
        let _ = self.rl.add_history_entry(line.trim());
        debug!("[Repl] {:?}", command);

        match command {
            Command::Quit => return Ok(false),
            Command::Price(price) => self.show_price(price).await,
            Command::Save(name) => self.save(&name).await,
            Command::History => self.show_history().await,
            Command::Use(row) => self.reuse(row).await,
            Command::Delete(row) => self.delete(row).await,
            Command::Profile => {
                if let Some(profile) = self.flow.profile() {
                    for line in render::profile_lines(profile, self.flow.hourly_wage()) {
                        println!("{}", line);
                    }
                }
            }
            Command::Edit => {
                self.close_history();
                if let Err(e) = self.flow.begin_edit() {
                    print_failure("No se pudo editar el perfil", &e);
                }
            }
            Command::Cancel => println!("{}", "Nada que cancelar.".bright_black()),
            Command::Reset => {
                self.close_history();
                match self.flow.reset_profile() {
                    Ok(()) => println!("{}", "Perfil local borrado.".yellow()),
                    Err(e) => print_failure("No se pudo borrar el perfil local", &e),
                }
            }
            Command::Clear => {
                self.flow.clear_price();
                println!("{}", "Resultado limpio.".bright_black());
            }
            Command::Help => {
                for line in render::help_lines() {
                    println!("{}", line.bright_black());
                }
            }
            Command::Invalid(message) => println!("{}", message.red()),
        }
        Ok(true)
    }

    async fn show_price(&mut self, price: f64) {
        let frames = self.flow.animation();
        let calc = match self.flow.enter_price(price) {
            Ok(calc) => calc.clone(),
            Err(e) => {
                println!("{}", format!("No se pudo calcular: {}", e).red());
                return;
            }
        };

        if calc.is_saveable() {
            render::animate(frames).await;
        }
        for line in render::calculation_lines(&calc) {
            println!("{}", line);
        }
        if calc.is_saveable() {
            println!("{}", "  /save <nombre> para guardar esta búsqueda".bright_black());
        }
    }

    async fn save(&mut self, name: &str) {
        if name.trim().is_empty() {
            println!("{}", "uso: /save <nombre del producto>".red());
            return;
        }
        match self.flow.save_search(name).await {
            Ok(record) => {
                let saved = format!(
                    "Guardado: {} ({})",
                    record.product_name,
                    format_mxn(record.product_cost)
                );
                println!("{}", saved.bright_green());
            }
            Err(FrivoloError::InvalidState(_)) => {
                println!("{}", "Primero escribe un precio.".yellow());
            }
            Err(e) => println!("{}", format!("No se pudo guardar: {}", e).red()),
        }
    }

    async fn show_history(&mut self) {
        let history = match self.history_view() {
            Ok(history) => history,
            Err(e) => {
                println!("{}", e.to_string().red());
                return;
            }
        };
        // a failed refresh leaves the state in Failed
        let _ = history.refresh().await;

        match history.state() {
            HistoryState::Loaded(records) => {
                for line in render::history_lines(&records) {
                    println!("{}", line);
                }
            }
            HistoryState::Failed(message) => {
                println!(
                    "{}",
                    format!("No pudimos cargar tus búsquedas: {}", message).red()
                );
            }
            HistoryState::Idle | HistoryState::Loading => {}
        }
    }

    async fn reuse(&mut self, row: usize) {
        let Some(price) = self.history.as_ref().and_then(|h| h.select(row - 1)) else {
            println!("{}", "Usa /history primero y elige una fila existente.".yellow());
            return;
        };
        self.show_price(price).await;
    }

    async fn delete(&mut self, row: usize) {
        let Some(history) = self.history.clone() else {
            println!("{}", "Usa /history primero.".yellow());
            return;
        };
        let Some(record) = history.record_at(row - 1) else {
            println!("{}", "No existe esa fila.".yellow());
            return;
        };

        if history.delete(&record.id).await {
            println!("{}", format!("Borrado: {}", record.product_name).bright_black());
            for line in render::history_lines(&history.records()) {
                println!("{}", line);
            }
        } else {
            println!("{}", "No se pudo borrar la búsqueda.".red());
        }
    }

    fn history_view(&mut self) -> frivolo_core::Result<SearchHistory> {
        if let Some(history) = &self.history {
            return Ok(history.clone());
        }
        let history = self.flow.history()?;
        self.history = Some(history.clone());
        Ok(history)
    }

    fn close_history(&mut self) {
        if let Some(history) = self.history.take() {
            history.close();
        }
    }
}

fn print_failure(action: &str, err: &FrivoloError) {
    println!("{}", format!("{}: {}", action, err).red());
}
