use chrono::{Datelike, Local, NaiveDate};
use ratatui::widgets::TableState;
use crate::commands::{cmd_add, cmd_member_add, cmd_member_remove, cmd_remove, cmd_status};
use crate::dates::{month_bounds, shift_month};
use crate::error::Result;
use crate::models::{Chore, ChoreInstance, Member};
use crate::recurrence::{expand, sort_chronologically};
use crate::storage::{load_chores, load_members};

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    Adding,
}

pub enum ViewMode {
    Calendar,
    Members,
}

pub struct App {
    /// First day of the month on screen.
    pub month: NaiveDate,
    pub chores: Vec<Chore>,
    pub instances: Vec<ChoreInstance>,
    pub members: Vec<Member>,
    pub state: TableState,
    pub member_state: TableState,
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub add_state: AddState,
    /// Only show this member's chores.
    pub assignee_filter: Option<u64>,
    /// Last error or confirmation, shown in the help bar.
    pub message: Option<String>,
}

/// State for the multi-step add wizards.
#[derive(Default)]
pub struct AddState {
    pub title: String,
    pub date: String,
    pub recur: Option<String>,
    pub step: usize, // chore: 0 title, 1 date, 2 recur, 3 assignee; member: 0 name, 1 color
}

impl App {
    /// Creates a new App showing the current month and loads initial data.
    pub fn new() -> App {
        App::for_month(Local::now().date_naive())
    }

    /// Creates an App showing the month containing `date`.
    pub fn for_month(date: NaiveDate) -> App {
        let mut app = App {
            month: shift_month(date, 0),
            chores: Vec::new(),
            instances: Vec::new(),
            members: Vec::new(),
            state: TableState::default(),
            member_state: TableState::default(),
            view_mode: ViewMode::Calendar,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            add_state: AddState::default(),
            assignee_filter: None,
            message: None,
        };
        app.reload();
        app
    }

    /// Keeps the error text of a failed command for the help bar.
    fn report<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.message = Some(e.to_string());
                None
            }
        }
    }

    /// Reloads chores and members and re-expands the visible month.
    pub fn reload(&mut self) {
        let chores = load_chores();
        self.chores = self.report(chores).unwrap_or_default();
        let members = load_members();
        self.members = self.report(members).unwrap_or_default();

        let (start, end) = month_bounds(self.month);
        let members = &self.members;
        let mut instances = expand(&self.chores, start, end, |id| {
            members.iter().find(|m| m.id == id).map(|m| m.color.clone())
        });
        if let Some(a) = self.assignee_filter {
            instances.retain(|i| i.assignee_id == Some(a));
        }
        sort_chronologically(&mut instances);
        self.instances = instances;

        clamp_selection(&mut self.state, self.instances.len());
        clamp_selection(&mut self.member_state, self.members.len());
    }

    fn selected_len(&self) -> usize {
        match self.view_mode {
            ViewMode::Calendar => self.instances.len(),
            ViewMode::Members => self.members.len(),
        }
    }

    fn selected_state(&mut self) -> &mut TableState {
        match self.view_mode {
            ViewMode::Calendar => &mut self.state,
            ViewMode::Members => &mut self.member_state,
        }
    }

    /// Selects the next row in the current view.
    pub fn next(&mut self) {
        let len = self.selected_len();
        if len == 0 { return; }
        let state = self.selected_state();
        let i = match state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        state.select(Some(i));
    }

    /// Selects the previous row in the current view.
    pub fn previous(&mut self) {
        let len = self.selected_len();
        if len == 0 { return; }
        let state = self.selected_state();
        let i = match state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        state.select(Some(i));
    }

    /// Moves the calendar by `delta` months.
    pub fn shift_month(&mut self, delta: i32) {
        self.month = shift_month(self.month, delta);
        self.state.select(None);
        self.reload();
    }

    /// Jumps back to the current month.
    pub fn goto_today(&mut self) {
        self.month = shift_month(Local::now().date_naive(), 0);
        self.reload();
    }

    /// Cycles the assignee filter: everyone, then each member in turn.
    pub fn cycle_filter(&mut self) {
        let ids: Vec<u64> = self.members.iter().map(|m| m.id).collect();
        self.assignee_filter = match self.assignee_filter {
            None => ids.first().copied(),
            Some(current) => ids
                .iter()
                .position(|id| *id == current)
                .and_then(|pos| ids.get(pos + 1).copied()),
        };
        self.reload();
    }

    pub fn filter_name(&self) -> String {
        match self.assignee_filter {
            None => "everyone".to_string(),
            Some(id) => self
                .members
                .iter()
                .find(|m| m.id == id)
                .map(|m| m.name.clone())
                .unwrap_or_else(|| format!("#{id}")),
        }
    }

    fn selected_instance(&self) -> Option<&ChoreInstance> {
        self.state.selected().and_then(|i| self.instances.get(i))
    }

    /// The stored chore behind a calendar row.
    pub fn base_chore(&self, instance: &ChoreInstance) -> Option<&Chore> {
        self.chores.iter().find(|c| c.id == instance.base_chore_id)
    }

    /// Advances the status of the selected occurrence's chore.
    pub fn cycle_status(&mut self) {
        if let ViewMode::Members = self.view_mode { return; }
        let Some(chore) = self.selected_instance().and_then(|i| self.base_chore(i)) else {
            return;
        };
        let (id, next) = (chore.id, chore.status.next());
        let result = cmd_status(id, next.as_str(), true);
        self.report(result);
        self.reload();
    }

    /// Deletes the selected chore (all its occurrences) or team member.
    pub fn delete_selected(&mut self) {
        match self.view_mode {
            ViewMode::Calendar => {
                if let Some(id) = self.selected_instance().map(|i| i.base_chore_id) {
                    let result = cmd_remove(id, true);
                    if self.report(result).is_some() {
                        self.message = Some(format!("Chore {} removed.", id));
                    }
                }
            }
            ViewMode::Members => {
                let selected = self.member_state.selected().and_then(|i| self.members.get(i));
                if let Some(id) = selected.map(|m| m.id) {
                    let result = cmd_member_remove(id, true);
                    if let Some(n) = self.report(result) {
                        self.message = Some(format!("Member removed, {} chores unassigned.", n));
                    }
                    if self.assignee_filter == Some(id) {
                        self.assignee_filter = None;
                    }
                }
            }
        }
        self.reload();
    }

    /// Toggles between the calendar and members views.
    pub fn toggle_view(&mut self) {
        self.view_mode = match self.view_mode {
            ViewMode::Calendar => ViewMode::Members,
            ViewMode::Members => ViewMode::Calendar,
        };
    }

    /// Initiates the add wizard for the current view.
    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
        self.message = None;
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    /// Handles Enter in the add wizard.
    pub fn handle_input(&mut self) {
        let input = self.input_buffer.trim().to_string();
        match self.view_mode {
            ViewMode::Calendar => match self.add_state.step {
                0 => { // Title
                    if !input.is_empty() {
                        self.add_state.title = input;
                        self.advance();
                    }
                }
                1 => { // Date, defaults to the first of the visible month
                    self.add_state.date = if input.is_empty() { self.month.to_string() } else { input };
                    self.advance();
                }
                2 => { // Recur
                    if !input.is_empty() {
                        self.add_state.recur = Some(input);
                    }
                    self.advance();
                }
                3 => { // Assignee
                    let assignee = input.parse::<u64>().ok();
                    let result = cmd_add(
                        self.add_state.title.clone(),
                        self.add_state.date.clone(),
                        assignee,
                        self.add_state.recur.clone(),
                        None,
                        None,
                        true,
                    );
                    if let Some(id) = self.report(result) {
                        self.message = Some(format!("Chore {} added.", id));
                    }
                    self.finish_add();
                }
                _ => {}
            },
            ViewMode::Members => match self.add_state.step {
                0 => { // Name
                    if !input.is_empty() {
                        self.add_state.title = input;
                        self.advance();
                    }
                }
                1 => { // Color
                    let color = if input.is_empty() { None } else { Some(input) };
                    let result = cmd_member_add(self.add_state.title.clone(), None, None, color, true);
                    if let Some(id) = self.report(result) {
                        self.message = Some(format!("Member {} added.", id));
                    }
                    self.finish_add();
                }
                _ => {}
            },
        }
    }

    fn advance(&mut self) {
        self.add_state.step += 1;
        self.input_buffer.clear();
    }

    fn finish_add(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
        self.reload();
    }

    /// Heading for the calendar table, e.g. `January 2025`.
    pub fn month_title(&self) -> String {
        format!("{} {}", self.month.format("%B"), self.month.year())
    }
}

fn clamp_selection(state: &mut TableState, len: usize) {
    if len == 0 {
        state.select(None);
    } else if let Some(i) = state.selected() {
        if i >= len {
            state.select(Some(len - 1));
        }
    } else {
        state.select(Some(0));
    }
}
