use crate::form::{FormAction, PredictionForm};
use crate::predictor::{Prediction, Predictor};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};
use std::io::{self, Stdout};
use std::time::Duration;

pub const ARTIFACTS_NOT_LOADED: &str = "Model artifacts not loaded. Check server logs.";

const TITLE: &str = "🌳 Deforestation Risk Prediction";
const SUBTITLE: &str =
    "Enter the data for a specific geographical tile to predict the risk of a deforestation event.";

#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    Empty,
    Prediction(Prediction),
    Message(String),
}

pub struct App {
    form: PredictionForm,
    predictor: Option<Predictor>,
    result: ResultView,
}

impl App {
    pub fn new(predictor: Option<Predictor>) -> Self {
        App { form: PredictionForm::new(), predictor, result: ResultView::Empty }
    }

    pub fn form_mut(&mut self) -> &mut PredictionForm {
        &mut self.form
    }

    pub fn result(&self) -> &ResultView {
        &self.result
    }

    /// Runs the prediction for the current form contents.
    pub fn submit(&mut self) {
        let Some(predictor) = &self.predictor else {
            self.result = ResultView::Message(ARTIFACTS_NOT_LOADED.to_string());
            return;
        };
        self.result = match self.form.tile_features() {
            Err(e) => ResultView::Message(e.to_string()),
            Ok(tile) => match predictor.predict(&tile) {
                Ok(prediction) => {
                    info!("{} / {}: {}", tile.region, tile.country, prediction);
                    ResultView::Prediction(prediction)
                }
                Err(e) => {
                    error!("Prediction failed: {}", e);
                    ResultView::Message(format!("Prediction failed: {}", e))
                }
            },
        };
    }

    fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match self.form.handle_key(key) {
                        FormAction::Quit => return Ok(()),
                        FormAction::Predict => self.submit(),
                        FormAction::None => {}
                    }
                }
            }
        }
    }

    fn render(&self, f: &mut Frame) {
        let row_count = self.form.row_lengths().len() as u16;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),             // Title
                Constraint::Length(row_count * 3), // Form
                Constraint::Length(3),             // Button
                Constraint::Min(8),                // Result
                Constraint::Length(1),             // Controls
            ])
            .split(f.area());

        let header = Paragraph::new(vec![
            Line::from(TITLE).style(Style::default().add_modifier(Modifier::BOLD)),
            Line::from(SUBTITLE),
        ])
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::BOTTOM));
        f.render_widget(header, chunks[0]);

        self.render_form(f, chunks[1]);
        self.render_button(f, chunks[2]);
        self.render_result(f, chunks[3]);

        let controls = Paragraph::new(
            "Tab/↓ next  Shift-Tab/↑ previous  ←/→ change choice  Enter predict  Esc quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        f.render_widget(controls, chunks[4]);
    }

    fn render_form(&self, f: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(3); self.form.row_lengths().len()])
            .split(area);

        let mut index = 0;
        for (row_area, &len) in rows.iter().zip(self.form.row_lengths()) {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, len as u32); len])
                .split(*row_area);
            for cell in cells.iter() {
                let field = &self.form.fields()[index];
                let style = if self.form.focus() == index {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::White)
                };
                let widget = Paragraph::new(field.display_value())
                    .block(Block::default().borders(Borders::ALL).title(field.label()))
                    .style(style);
                f.render_widget(widget, *cell);
                index += 1;
            }
        }
    }

    fn render_button(&self, f: &mut Frame, area: Rect) {
        let style = if self.form.button_focused() {
            Style::default().fg(Color::Black).bg(Color::LightGreen).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD)
        };
        let button = Paragraph::new("Predict Risk")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
            .style(style);
        f.render_widget(button, area);
    }

    fn render_result(&self, f: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Prediction Result");
        let inner = block.inner(area);
        f.render_widget(block, area);

        match &self.result {
            ResultView::Empty => {
                let hint = Paragraph::new("Fill in the tile data and press Enter.")
                    .style(Style::default().fg(Color::DarkGray));
                f.render_widget(hint, inner);
            }
            ResultView::Message(message) => {
                let text = Paragraph::new(message.as_str())
                    .wrap(Wrap { trim: true })
                    .style(Style::default().fg(Color::Red));
                f.render_widget(text, inner);
            }
            ResultView::Prediction(prediction) => {
                let [top, second] = prediction.ranked();
                let label = Paragraph::new(top.0).style(Style::default().add_modifier(Modifier::BOLD));
                let slots = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(1), Constraint::Length(3), Constraint::Length(3)])
                    .split(inner);
                f.render_widget(label, slots[0]);
                for ((name, confidence), slot) in [top, second].into_iter().zip(&slots[1..]) {
                    let gauge = Gauge::default()
                        .block(Block::default().borders(Borders::ALL).title(name))
                        .gauge_style(Style::default().fg(Color::Green))
                        .ratio(confidence.clamp(0.0, 1.0))
                        .label(format!("{:.2}%", confidence * 100.0));
                    f.render_widget(gauge, *slot);
                }
            }
        }
    }
}

pub fn init_tui(predictor: Option<Predictor>) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(predictor);
    let outcome = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::LogisticParams;
    use crate::artifacts::ModelArtifacts;
    use crate::errors::FormError;
    use crate::scalers::ScalerParams;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;

    fn predictor() -> Predictor {
        Predictor::new(
            ModelArtifacts::new(
                LogisticParams { weights: vec![1.0], bias: 0.0 },
                ScalerParams { mean: vec![0.0], scale: vec![1.0] },
                vec!["Latitude".to_string()],
            )
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn submit_without_artifacts_shows_guard_message() {
        let mut app = App::new(None);
        app.submit();
        assert_eq!(app.result(), &ResultView::Message(ARTIFACTS_NOT_LOADED.to_string()));
    }

    #[test]
    fn submit_with_model_shows_prediction() {
        let mut app = App::new(Some(predictor()));
        app.submit();
        assert_eq!(
            app.result(),
            &ResultView::Prediction(Prediction { no_deforestation: 0.5, deforestation: 0.5 })
        );
    }

    #[test]
    fn submit_reports_form_errors() {
        let mut app = App::new(Some(predictor()));
        let form = app.form_mut();
        while form.fields().get(form.focus()).map(|f| f.label()) != Some("Latitude") {
            form.focus_next();
        }
        form.handle_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE));
        app.submit();

        let expected = FormError::Empty { label: "Latitude".to_string() }.to_string();
        assert_eq!(app.result(), &ResultView::Message(expected));
    }

    #[test]
    fn renders_form_and_result() {
        let mut app = App::new(Some(predictor()));
        app.submit();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Predict Risk"));
        assert!(text.contains("Prediction Result"));
        assert!(text.contains("Latitude"));
        assert!(text.contains("50.00%"));
    }
}
