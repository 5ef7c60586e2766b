/// Terminal UI for the asynchronous session: two cards side by side, arrow keys to choose.
use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use tracing::debug;

use crate::session::{ComparisonRequest, Mailbox, SessionUi, UiEvent};

/// How long to wait for a key before checking the mailbox again.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Left,
    Right,
}

impl Choice {
    fn label(self) -> &'static str {
        match self {
            Choice::Left => "left",
            Choice::Right => "right",
        }
    }
}

/// UI model: the pair on screen and its reply slot, if any.
///
/// Holds at most one request. The run loop only pulls the next event from the
/// mailbox while this is idle.
pub struct TuiState {
    pending: Option<ComparisonRequest>,
    status: String,
    answered: usize,
    max_comparisons: usize,
}

impl TuiState {
    pub fn new(max_comparisons: usize) -> Self {
        TuiState {
            pending: None,
            status: "Waiting for first comparison...".to_string(),
            answered: 0,
            max_comparisons,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }

    pub fn pending_pair(&self) -> Option<(&str, &str)> {
        self.pending.as_ref().map(|r| (r.a.as_str(), r.b.as_str()))
    }

    pub fn answered(&self) -> usize {
        self.answered
    }

    pub fn handle_event(&mut self, event: UiEvent) -> Flow {
        match event {
            UiEvent::Compare(request) => {
                debug_assert!(self.pending.is_none(), "request arrived while another is pending");
                self.pending = Some(request);
                self.status = "Use ← / → (or h / l) to choose. Press q to quit.".to_string();
                Flow::Continue
            }
            UiEvent::Quit => Flow::Quit,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Flow::Quit,
            KeyCode::Char('q') | KeyCode::Esc => Flow::Quit,
            KeyCode::Left | KeyCode::Char('h') => {
                self.choose(Choice::Left);
                Flow::Continue
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.choose(Choice::Right);
                Flow::Continue
            }
            _ => Flow::Continue,
        }
    }

    fn choose(&mut self, choice: Choice) {
        // Direction keys with nothing on screen are ignored.
        let Some(request) = self.pending.take() else {
            return;
        };
        if !request.answer(choice == Choice::Left) {
            debug!("sorter no longer waiting for this answer");
        }
        self.answered += 1;
        self.status = format!("Sent choice: {}", choice.label());
    }

    fn progress(&self) -> String {
        let current = if self.is_idle() { self.answered } else { self.answered + 1 };
        format!("Comparison {} (at most {})", current, self.max_comparisons)
    }

    pub fn render(&self, f: &mut Frame<'_>) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(5),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(f.size());

        let title = Paragraph::new(Line::from(Span::styled(
            "Which do you prefer?",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        f.render_widget(title, rows[0]);

        match self.pending_pair() {
            Some((a, b)) => render_cards(f, rows[1], a, b),
            None => {
                let idle = Paragraph::new(self.status.as_str())
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL));
                f.render_widget(idle, rows[1]);
            }
        }

        f.render_widget(Paragraph::new(self.progress()), rows[2]);
        f.render_widget(
            Paragraph::new(self.status.as_str()).style(Style::default().fg(Color::DarkGray)),
            rows[3],
        );
    }
}

fn render_cards(f: &mut Frame<'_>, area: Rect, a: &str, b: &str) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (text, title, rect) in [(a, "← h", cols[0]), (b, "l →", cols[1])] {
        let card = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(card, rect);
    }
}

/// The real terminal front end: raw mode, alternate screen, crossterm key events.
pub struct TerminalUi {
    max_comparisons: usize,
}

impl TerminalUi {
    pub fn new(max_comparisons: usize) -> Self {
        TerminalUi { max_comparisons }
    }
}

impl SessionUi for TerminalUi {
    fn run(self, mut mailbox: Mailbox) -> io::Result<()> {
        let mut terminal = setup_terminal()?;
        let mut state = TuiState::new(self.max_comparisons);

        let result = run_loop(&mut terminal, &mut state, &mut mailbox, |_| {
            read_key(POLL_INTERVAL)
        });

        // Restore even if the loop failed; the loop error wins.
        let restored = restore_terminal(&mut terminal);
        debug!(answered = state.answered(), "terminal UI stopped");
        result.and(restored)
    }
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .and_then(|_| Terminal::new(CrosstermBackend::new(stdout)))
        .inspect_err(|_| {
            let _ = disable_raw_mode();
        })
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

/// Next key press from the terminal, or `None` if nothing arrived within `timeout`.
fn read_key(timeout: Duration) -> io::Result<Option<KeyEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
        _ => Ok(None),
    }
}

/// Drive `state` until the user or the session quits.
///
/// The next mailbox event is only taken while no request is on screen; a
/// pending request stays put until a direction key answers it. `next_key`
/// is called once per frame and may block briefly.
fn run_loop<B, K>(
    terminal: &mut Terminal<B>,
    state: &mut TuiState,
    mailbox: &mut Mailbox,
    mut next_key: K,
) -> io::Result<()>
where
    B: Backend,
    K: FnMut(&TuiState) -> io::Result<Option<KeyEvent>>,
{
    loop {
        if state.is_idle() {
            if let Some(event) = mailbox.try_recv() {
                if state.handle_event(event) == Flow::Quit {
                    return Ok(());
                }
            }
        }

        terminal.draw(|f| state.render(f))?;

        if let Some(key) = next_key(state)? {
            if state.handle_key(key) == Flow::Quit {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SessionOutcome, run_session};
    use ratatui::backend::TestBackend;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_direction_without_pending_is_ignored() {
        let mut state = TuiState::new(3);
        assert_eq!(state.handle_key(key(KeyCode::Left)), Flow::Continue);
        assert_eq!(state.handle_key(key(KeyCode::Char('l'))), Flow::Continue);
        assert_eq!(state.answered(), 0);
        assert!(state.is_idle());
    }

    #[test]
    fn test_left_prefers_a() {
        let mut state = TuiState::new(3);
        let (request, mut answer) = ComparisonRequest::new("Apple", "Banana");
        assert_eq!(state.handle_event(UiEvent::Compare(request)), Flow::Continue);
        assert_eq!(state.pending_pair(), Some(("Apple", "Banana")));

        state.handle_key(key(KeyCode::Char('h')));
        assert_eq!(answer.try_recv(), Ok(true));
        assert!(state.is_idle());
        assert_eq!(state.answered(), 1);
    }

    #[test]
    fn test_right_prefers_b_once() {
        let mut state = TuiState::new(3);
        let (request, mut answer) = ComparisonRequest::new("Apple", "Banana");
        state.handle_event(UiEvent::Compare(request));

        state.handle_key(key(KeyCode::Right));
        // A second press has nothing to answer.
        state.handle_key(key(KeyCode::Left));
        assert_eq!(answer.try_recv(), Ok(false));
        assert_eq!(state.answered(), 1);
    }

    #[test]
    fn test_quit_keys() {
        let mut state = TuiState::new(0);
        assert_eq!(state.handle_key(key(KeyCode::Char('q'))), Flow::Quit);
        assert_eq!(state.handle_key(key(KeyCode::Esc)), Flow::Quit);
        assert_eq!(
            state.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Flow::Quit
        );
        assert_eq!(state.handle_key(key(KeyCode::Char('c'))), Flow::Continue);
        assert_eq!(state.handle_event(UiEvent::Quit), Flow::Quit);
    }

    fn screen(state: &TuiState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        terminal.draw(|f| state.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_shows_both_cards() {
        let mut state = TuiState::new(3);
        let (request, _answer) = ComparisonRequest::new("Apple", "Banana");
        state.handle_event(UiEvent::Compare(request));

        let text = screen(&state);
        assert!(text.contains("Which do you prefer?"));
        assert!(text.contains("Apple"));
        assert!(text.contains("Banana"));
        assert!(text.contains("Comparison 1 (at most 3)"));
    }

    #[test]
    fn test_render_idle() {
        let text = screen(&TuiState::new(3));
        assert!(text.contains("Waiting for first comparison..."));
        assert!(text.contains("Comparison 0 (at most 3)"));
    }

    #[test]
    fn test_run_loop_keeps_pending_request_until_answered() {
        let (tx, mut mailbox) = Mailbox::channel();
        let (first, mut first_answer) = ComparisonRequest::new("Apple", "Banana");
        let (second, mut second_answer) = ComparisonRequest::new("Cherry", "Damson");
        // Everything is queued up front, while the first pair will still be unanswered.
        tx.send(UiEvent::Compare(first)).unwrap();
        tx.send(UiEvent::Compare(second)).unwrap();
        tx.send(UiEvent::Quit).unwrap();

        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        let mut state = TuiState::new(3);
        let mut script = vec![None, None, Some(KeyCode::Right), None, Some(KeyCode::Left)].into_iter();
        let mut on_screen = Vec::new();

        run_loop(&mut terminal, &mut state, &mut mailbox, |state| {
            on_screen.push(state.pending_pair().map(|(a, b)| format!("{a}/{b}")));
            // Running past the script presses q, which the assertions below would catch.
            Ok(script.next().unwrap_or(Some(KeyCode::Char('q'))).map(key))
        })
        .unwrap();

        let ab = Some("Apple/Banana".to_string());
        let cd = Some("Cherry/Damson".to_string());
        assert_eq!(on_screen, vec![ab.clone(), ab.clone(), ab, cd.clone(), cd]);
        assert_eq!(first_answer.try_recv(), Ok(false));
        assert_eq!(second_answer.try_recv(), Ok(true));
        assert_eq!(state.answered(), 2);
    }

    /// The real run loop on a test backend. Each scripted key is pressed once a
    /// pair is on screen; afterwards it presses q.
    struct ScriptedTerminalUi {
        keys: Vec<KeyCode>,
        seen: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl SessionUi for ScriptedTerminalUi {
        fn run(self, mut mailbox: Mailbox) -> io::Result<()> {
            let mut terminal = Terminal::new(TestBackend::new(80, 12))?;
            let mut state = TuiState::new(0);
            let mut keys = self.keys.into_iter();
            let seen = self.seen;
            run_loop(&mut terminal, &mut state, &mut mailbox, |state| {
                let Some((a, b)) = state.pending_pair() else {
                    std::thread::sleep(Duration::from_millis(1));
                    return Ok(None);
                };
                seen.lock().unwrap().push((a.to_string(), b.to_string()));
                Ok(Some(key(keys.next().unwrap_or(KeyCode::Char('q')))))
            })
        }
    }

    #[tokio::test]
    async fn test_key_driven_session() {
        let items: Vec<String> = ["X", "Y", "Z"].iter().map(|s| s.to_string()).collect();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let ui = ScriptedTerminalUi {
            keys: vec![KeyCode::Left, KeyCode::Right, KeyCode::Char('h')],
            seen: seen.clone(),
        };

        let outcome = tokio::time::timeout(Duration::from_secs(10), run_session(items, ui))
            .await
            .expect("session did not shut down")
            .unwrap();

        let SessionOutcome::Completed(ranking) = outcome else {
            panic!("session aborted");
        };
        assert_eq!(ranking.items(), ["Y", "X", "Z"]);
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_quit_key_aborts_session() {
        let items: Vec<String> = ["X", "Y", "Z"].iter().map(|s| s.to_string()).collect();
        let ui = ScriptedTerminalUi {
            keys: vec![KeyCode::Left, KeyCode::Char('q')],
            seen: Arc::default(),
        };

        let outcome = tokio::time::timeout(Duration::from_secs(10), run_session(items, ui))
            .await
            .expect("session did not shut down")
            .unwrap();
        assert!(matches!(outcome, SessionOutcome::Aborted));
    }
}
