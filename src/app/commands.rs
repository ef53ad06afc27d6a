use crate::core::requests::{AverageQuery, RateRequest};
use crate::core::service::RatingService;
use crate::core::Store;
use crate::domain::model::{AverageRating, ProfessorListing, Rating, RatingView};
use crate::domain::session::Session;
use crate::utils::error::Result;
use serde::Serialize;

/// What the front end asked for, with ids still in their raw form.
#[derive(Debug, Clone)]
pub enum AppCommand {
    List,
    View,
    Average(AverageQuery),
    Rate(RateRequest),
}

const SEPARATOR_WIDTH: usize = 50;

/// Runs one command and renders its result, as text or as pretty JSON.
pub async fn run_command<S: Store>(
    service: &RatingService<S>,
    session: &Session,
    command: AppCommand,
    json: bool,
) -> Result<String> {
    match command {
        AppCommand::List => {
            let professors = service.list_professors().await?;
            render(professors.as_slice(), json, format_professors)
        }
        AppCommand::View => {
            let ratings = service.list_ratings().await?;
            render(ratings.as_slice(), json, format_ratings)
        }
        AppCommand::Average(query) => {
            let (professor, module) = query.parse()?;
            let average = service.average_rating(professor, module).await?;
            render(&average, json, format_average)
        }
        AppCommand::Rate(request) => {
            let parsed = request.parse()?;
            let rating = service
                .create_rating(
                    session,
                    parsed.professor,
                    parsed.module,
                    parsed.rating,
                    parsed.comment,
                )
                .await?;
            render(&rating, json, |_: &Rating| {
                "Rating submitted successfully!".to_string()
            })
        }
    }
}

fn render<T: Serialize + ?Sized>(value: &T, json: bool, text: impl Fn(&T) -> String) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(text(value))
    }
}

pub fn format_professors(professors: &[ProfessorListing]) -> String {
    if professors.is_empty() {
        return "No professors found.".to_string();
    }

    let mut lines = vec!["--- Professors List ---".to_string()];
    for professor in professors {
        lines.push(format!(
            "- {} (Professor ID: {})",
            professor.name, professor.id
        ));
        if professor.modules.is_empty() {
            lines.push("Modules: No modules assigned".to_string());
        } else {
            lines.push("  Modules:".to_string());
            for module in &professor.modules {
                lines.push(format!(
                    "    - {} (Module ID: {}, Year: {}, Semester: {})",
                    module.name, module.id, module.year, module.semester
                ));
            }
            lines.push("-".repeat(SEPARATOR_WIDTH));
        }
    }
    lines.join("\n")
}

pub fn format_ratings(ratings: &[RatingView]) -> String {
    if ratings.is_empty() {
        return "No ratings found.".to_string();
    }

    let mut lines = vec!["--- View Ratings ---".to_string()];
    for view in ratings {
        lines.push(format!(
            "Professor: {} (ID: {})",
            view.professor.name, view.professor.id
        ));
        lines.push(format!(
            "    - Module: {} (Module ID: {}, Year: {}, Semester: {})",
            view.module.name, view.module.id, view.module.year, view.module.semester
        ));
        lines.push(format!("        - Rating: {}", view.rating));
        lines.push(format!(
            "        - Comment: {}",
            view.comment.as_deref().unwrap_or("")
        ));
        lines.push(format!("        - Date: {}", view.date.to_rfc3339()));
        lines.push("-".repeat(SEPARATOR_WIDTH));
    }
    lines.join("\n")
}

pub fn format_average(average: &AverageRating) -> String {
    format!(
        "The average rating for that professor is {} stars.",
        average.average_rating
    )
}
