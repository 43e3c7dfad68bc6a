//! Team registry
//!
//! Team id → team state, plus the team whose page is being shown. Tab labels
//! are derived from it: the team name, with a `*` while the team still has
//! to act.

use std::collections::BTreeMap;

use eclipse_shared::{Colour, Race, TeamId};

use crate::application::dto::TeamUpdate;
use crate::ports::outbound::ClientUi;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub race: Option<Race>,
    pub colour: Option<Colour>,
    pub is_waiting: bool,
}

impl Team {
    pub fn tab_label(&self) -> String {
        if self.is_waiting {
            format!("{}*", self.name)
        } else {
            self.name.clone()
        }
    }
}

impl From<TeamUpdate> for Team {
    fn from(update: TeamUpdate) -> Self {
        Self {
            id: update.id,
            name: update.name,
            race: update.race,
            colour: update.colour,
            is_waiting: update.is_waiting,
        }
    }
}

#[derive(Debug, Default)]
pub struct TeamRegistry {
    teams: BTreeMap<TeamId, Team>,
    current: Option<TeamId>,
}

impl TeamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every team and relabel all tabs.
    pub fn replace_all(&mut self, teams: Vec<TeamUpdate>, ui: &dyn ClientUi) {
        self.teams = teams
            .into_iter()
            .map(|update| (update.id.clone(), Team::from(update)))
            .collect();
        if let Some(current) = &self.current {
            if !self.teams.contains_key(current) {
                self.current = None;
            }
        }
        self.refresh_tabs(ui);
    }

    pub fn upsert(&mut self, update: TeamUpdate, ui: &dyn ClientUi) {
        let team = Team::from(update);
        ui.set_tab_label(&team.id, &team.tab_label());
        self.teams.insert(team.id.clone(), team);
    }

    /// Returns false if the team is unknown.
    pub fn set_waiting(&mut self, id: &TeamId, is_waiting: bool, ui: &dyn ClientUi) -> bool {
        let Some(team) = self.teams.get_mut(id) else {
            tracing::warn!(team = %id, "Waiting flag for unknown team");
            return false;
        };
        team.is_waiting = is_waiting;
        ui.set_tab_label(&team.id, &team.tab_label());
        true
    }

    /// Returns false if the team is unknown.
    pub fn set_current(&mut self, id: TeamId) -> bool {
        if !self.teams.contains_key(&id) {
            tracing::warn!(team = %id, "Cannot show unknown team");
            return false;
        }
        self.current = Some(id);
        true
    }

    pub fn is_current_team(&self, id: &TeamId) -> bool {
        self.current.as_ref() == Some(id)
    }

    pub fn get(&self, id: &TeamId) -> Option<&Team> {
        self.teams.get(id)
    }

    pub fn tab_label(&self, id: &TeamId) -> Option<String> {
        self.teams.get(id).map(Team::tab_label)
    }

    pub fn refresh_tabs(&self, ui: &dyn ClientUi) {
        for team in self.teams.values() {
            ui.set_tab_label(&team.id, &team.tab_label());
        }
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::testing::{RecordingUi, UiCall};

    fn update(id: &str, name: &str, is_waiting: bool) -> TeamUpdate {
        TeamUpdate {
            id: TeamId::new(id),
            name: name.to_string(),
            race: None,
            colour: None,
            is_waiting,
        }
    }

    #[test]
    fn test_tab_label_marks_waiting_teams() {
        let ui = RecordingUi::new();
        let mut teams = TeamRegistry::new();
        teams.replace_all(vec![update("a", "Alice", true), update("b", "Bob", false)], &ui);

        assert_eq!(teams.tab_label(&TeamId::new("a")).as_deref(), Some("Alice*"));
        assert_eq!(teams.tab_label(&TeamId::new("b")).as_deref(), Some("Bob"));
        assert_eq!(
            ui.calls(),
            vec![
                UiCall::TabLabel(TeamId::new("a"), "Alice*".into()),
                UiCall::TabLabel(TeamId::new("b"), "Bob".into()),
            ]
        );
    }

    #[test]
    fn test_set_waiting_relabels_one_tab() {
        let ui = RecordingUi::new();
        let mut teams = TeamRegistry::new();
        teams.replace_all(vec![update("a", "Alice", false)], &ui);
        ui.take();

        assert!(teams.set_waiting(&TeamId::new("a"), true, &ui));
        assert_eq!(ui.calls(), vec![UiCall::TabLabel(TeamId::new("a"), "Alice*".into())]);

        assert!(!teams.set_waiting(&TeamId::new("zz"), true, &ui));
    }

    #[test]
    fn test_current_team_dropped_when_replaced_away() {
        let ui = RecordingUi::new();
        let mut teams = TeamRegistry::new();
        teams.replace_all(vec![update("a", "Alice", false)], &ui);

        assert!(!teams.set_current(TeamId::new("b")));
        assert!(teams.set_current(TeamId::new("a")));
        assert!(teams.is_current_team(&TeamId::new("a")));

        teams.replace_all(vec![update("b", "Bob", false)], &ui);
        assert!(!teams.is_current_team(&TeamId::new("a")));
    }

    #[test]
    fn test_upsert_overwrites_existing() {
        let ui = RecordingUi::new();
        let mut teams = TeamRegistry::new();
        teams.upsert(update("a", "Alice", false), &ui);
        teams.upsert(update("a", "Alicia", true), &ui);

        assert_eq!(teams.len(), 1);
        assert_eq!(teams.get(&TeamId::new("a")).map(|t| t.name.as_str()), Some("Alicia"));
    }
}
