use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::Palette;
use crate::view::form::{FormField, FormStatus, TransactionForm};

pub(super) fn render(f: &mut Frame, area: Rect, form: &TransactionForm, palette: Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let lines: Vec<Line> = FormField::all()
        .iter()
        .map(|&field| field_line(form, field, palette))
        .collect();

    let fields = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Add New Transaction"),
    );
    f.render_widget(fields, chunks[0]);

    let hint = Paragraph::new(format!(
        "{}: {} | Tab next field | Enter submit | Esc back",
        form.focus.label(),
        form.focus.hint()
    ))
    .style(Style::default().fg(palette.muted))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(hint, chunks[1]);

    if let Some(status) = &form.status {
        let color = match status {
            FormStatus::Submitting => Color::Yellow,
            FormStatus::Success(_) => Color::Green,
            FormStatus::Error(_) => Color::Red,
        };
        let message = Paragraph::new(status.text().to_string())
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(message, chunks[2]);
    }
}

fn field_line(form: &TransactionForm, field: FormField, palette: Palette) -> Line<'static> {
    let focused = form.focus == field;
    let label_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.accent)
    };

    let value = match field {
        FormField::Type if focused => format!("◀ {} ▶", form.kind),
        FormField::Type => form.kind.to_string(),
        _ if focused => format!("{}_", form.value(field)),
        _ => form.value(field).to_string(),
    };

    let marker = if focused { "▶" } else { " " };
    Line::from(vec![
        Span::styled(format!("{} {:<12}", marker, format!("{}:", field.label())), label_style),
        Span::styled(value, Style::default().fg(palette.text)),
    ])
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::api::fake::FakeProvider;
    use crate::error::ApiError;
    use crate::route::Route;
    use crate::ui::tests::{mounted, screen};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn blank_form_shows_defaults() {
        let (app, _rx) = mounted(FakeProvider::default(), Route::AddTransaction).await;
        let text = screen(&app);

        assert!(text.contains("▶ Add New Transaction"));
        assert!(text.contains("▶ Date:"));
        assert!(text.contains("Type:"));
        assert!(text.contains("Buy"));
        assert!(text.contains("Commission: 0"));
        assert!(text.contains("YYYY-MM-DD"));
    }

    #[tokio::test]
    async fn rejected_submission_shows_server_message() {
        let provider = FakeProvider {
            submit_response: Err(ApiError::Rejected {
                status: 400,
                message: "Invalid ticker".to_string(),
            }),
            ..FakeProvider::default()
        };
        let (mut app, mut rx) = mounted(provider, Route::AddTransaction).await;

        for (field, text) in [(0, "2024-01-05"), (1, "ZZZZ"), (3, "10"), (4, "50.00")] {
            while app_focus(&app) != field {
                app.handle_key(press(KeyCode::Tab));
            }
            for c in text.chars() {
                app.handle_key(press(KeyCode::Char(c)));
            }
        }
        app.handle_key(press(KeyCode::Enter));
        assert!(screen(&app).contains("Submitting..."));

        let update = rx.recv().await.expect("update");
        app.apply(update);
        let text = screen(&app);

        assert!(text.contains("Invalid ticker"));
        assert!(text.contains("ZZZZ"));
    }

    #[tokio::test]
    async fn blocked_submission_explains_the_constraint() {
        let (mut app, _rx) = mounted(FakeProvider::default(), Route::AddTransaction).await;
        app.handle_key(press(KeyCode::Enter));

        assert!(screen(&app).contains("Date is required"));
        assert_eq!(app.provider().total_calls(), 0);
    }

    fn app_focus(app: &crate::app::App<FakeProvider>) -> usize {
        match &app.section {
            crate::app::Section::AddTransaction(form) => crate::view::form::FormField::all()
                .iter()
                .position(|&f| f == form.focus)
                .unwrap_or(0),
            _ => panic!("form is not mounted"),
        }
    }
}
