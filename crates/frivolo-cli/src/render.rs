//! Terminal rendering of calculator results, profiles and history rows.

use std::io::Write;
use std::time::Duration;

use colored::Colorize;
use frivolo_application::{AnimationFrame, ProfileWizard};
use frivolo_core::search::SearchRecord;
use frivolo_core::user::UserProfile;
use frivolo_core::wage::{
    Calculation, format_duration, format_duration_compact, format_hourly_wage, format_mxn,
    format_percentage, format_short_date, progress_label,
};
use tokio::sync::watch;
use tokio::time::timeout;

const BAR_WIDTH: usize = 30;

/// Upper bound on how long the count-up is drawn before the prompt returns.
const ANIMATION_TIMEOUT: Duration = Duration::from_secs(3);

pub fn progress_bar(progress: f64) -> String {
    let ratio = (progress / 100.0).clamp(0.0, 1.0);
    let filled = (ratio * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn duration_text(hours: f64) -> String {
    format_duration(hours).unwrap_or_else(|_| "-".to_string())
}

pub fn frame_line(frame: &AnimationFrame) -> String {
    format!(
        "{:<24} {} {:>5.0}%",
        duration_text(frame.displayed_hours),
        progress_bar(frame.progress),
        frame.progress
    )
}

/// Draws frames in place until the save hint is revealed.
pub async fn animate(mut frames: watch::Receiver<AnimationFrame>) {
    let mut stdout = std::io::stdout();
    loop {
        let frame = *frames.borrow_and_update();
        print!("\r  {}", frame_line(&frame).bright_yellow());
        let _ = stdout.flush();

        if frame.save_visible {
            break;
        }
        match timeout(ANIMATION_TIMEOUT, frames.changed()).await {
            Ok(Ok(())) => {}
            _ => break,
        }
    }
    println!();
}

pub fn calculation_lines(calc: &Calculation) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{} cuesta {}",
            format_mxn(calc.price),
            calc.duration.to_string().bold()
        ),
        format!(
            "  {} de tu semana laboral · {}",
            format_percentage(calc.weekly_percentage),
            progress_label(calc.progress)
        ),
        format!("  Tu sueldo por hora: {}", format_hourly_wage(calc.hourly_wage)),
    ];
    if let Some(insight) = &calc.insight {
        lines.push(format!("  {}", insight));
    }
    lines
}

pub fn profile_lines(profile: &UserProfile, hourly_wage: Option<f64>) -> Vec<String> {
    let mut lines = vec![
        format!("{} · {}", profile.name.bold(), profile.job),
        format!("  {} · {} años · {}", profile.email, profile.age, profile.country),
        format!(
            "  {} al mes · {} h/día · {} días/semana",
            format_mxn(profile.monthly_salary),
            profile.hours_per_day,
            profile.days_per_week
        ),
    ];
    if let Some(wage) = hourly_wage {
        lines.push(format!("  {} por hora", format_hourly_wage(wage)));
    }
    lines
}

pub fn history_lines(records: &[SearchRecord]) -> Vec<String> {
    if records.is_empty() {
        return vec!["Aún no tienes búsquedas guardadas.".to_string()];
    }
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            format!(
                "{:>3}. {:<24} {:>16} {:>10}  {}",
                i + 1,
                record.product_name,
                format_mxn(record.product_cost),
                format_duration_compact(record.hours_needed).unwrap_or_default(),
                format_short_date(&record.created_at)
            )
        })
        .collect()
}

pub fn wizard_header(wizard: &ProfileWizard) -> String {
    let step = wizard.step();
    format!(
        "Paso {}/3 · {} ({}%)",
        step.index() + 1,
        step.title(),
        wizard.progress_percent()
    )
}

pub fn help_lines() -> Vec<&'static str> {
    vec![
        "<cantidad>       calcula cuántas horas de trabajo cuesta",
        "/save <nombre>   guarda el último cálculo",
        "/history         muestra tus búsquedas guardadas",
        "/use <n>         vuelve a calcular la búsqueda n",
        "/delete <n>      borra la búsqueda n",
        "/profile         muestra tu perfil",
        "/edit            edita tu perfil",
        "/reset           borra tu perfil local y empieza de nuevo",
        "/clear           limpia el resultado",
        "/quit            salir",
    ]
}
