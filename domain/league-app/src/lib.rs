use std::sync::Arc;

use crate::{
    domain::{
        fixture::PairingKind, r#match::MatchRepository, player::PlayerRepository,
        season::SeasonRepository, standings::StandingsRepository,
    },
    workflow::{
        player::{
            add::{AddPlayerUseCase, AddPlayerUseCaseImpl},
            list::{ListPlayersUseCase, ListPlayersUseCaseImpl},
            migrate_names::{MigratePlayerNamesUseCase, MigratePlayerNamesUseCaseImpl},
            toggle::{TogglePlayerUseCase, TogglePlayerUseCaseImpl},
        },
        result::record::{RecordResultUseCase, RecordResultUseCaseImpl},
        season::{
            active::{GetActiveSeasonUseCase, GetActiveSeasonUseCaseImpl},
            history::{SeasonHistoryUseCase, SeasonHistoryUseCaseImpl},
            open::{EnsureSeasonUseCase, EnsureSeasonUseCaseImpl},
            rollover::{StartNewSeasonUseCase, StartNewSeasonUseCaseImpl},
        },
        standings::{
            compute::{GetStandingsUseCase, GetStandingsUseCaseImpl},
            persist::PersistWeeklyStandingsWorkflowImpl,
        },
        week::{
            advance::{AdvanceWeekUseCase, AdvanceWeekUseCaseImpl},
            generate::{GenerateWeekUseCase, GenerateWeekUseCaseImpl},
            view::{GetWeekUseCase, GetWeekUseCaseImpl},
        },
    },
};

pub mod domain;
#[cfg(test)]
mod mock;
pub mod workflow;

#[derive(Clone, Debug)]
pub struct LeagueSettings {
    pub league_name: String,
    pub pairing: PairingKind,
}

impl Default for LeagueSettings {
    fn default() -> Self {
        Self {
            league_name: "FC 26".to_string(),
            pairing: PairingKind::RandomGreedy,
        }
    }
}

pub struct Application {
    pub player_add_use_case: Box<dyn AddPlayerUseCase + Send + Sync + 'static>,
    pub player_list_use_case: Box<dyn ListPlayersUseCase + Send + Sync + 'static>,
    pub player_toggle_use_case: Box<dyn TogglePlayerUseCase + Send + Sync + 'static>,
    pub player_migrate_names_use_case: Box<dyn MigratePlayerNamesUseCase + Send + Sync + 'static>,

    pub season_active_use_case: Box<dyn GetActiveSeasonUseCase + Send + Sync + 'static>,
    pub season_ensure_use_case: Box<dyn EnsureSeasonUseCase + Send + Sync + 'static>,
    pub season_new_use_case: Box<dyn StartNewSeasonUseCase + Send + Sync + 'static>,
    pub season_history_use_case: Box<dyn SeasonHistoryUseCase + Send + Sync + 'static>,

    pub week_generate_use_case: Box<dyn GenerateWeekUseCase + Send + Sync + 'static>,
    pub week_get_use_case: Box<dyn GetWeekUseCase + Send + Sync + 'static>,
    pub week_advance_use_case: Box<dyn AdvanceWeekUseCase + Send + Sync + 'static>,

    pub result_record_use_case: Box<dyn RecordResultUseCase + Send + Sync + 'static>,
    pub standings_get_use_case: Box<dyn GetStandingsUseCase + Send + Sync + 'static>,
}

pub fn build_application<
    P: PlayerRepository + Send + Sync + 'static,
    S: SeasonRepository + Send + Sync + 'static,
    M: MatchRepository + Send + Sync + 'static,
    W: StandingsRepository + Send + Sync + 'static,
>(
    player_repository: Arc<P>,
    season_repository: Arc<S>,
    match_repository: Arc<M>,
    standings_repository: Arc<W>,
    settings: LeagueSettings,
) -> Application {
    let persist_standings_workflow = Arc::new(PersistWeeklyStandingsWorkflowImpl::new(
        player_repository.clone(),
        match_repository.clone(),
        standings_repository.clone(),
    ));
    let pairing = settings.pairing.strategy();

    Application {
        player_add_use_case: Box::new(AddPlayerUseCaseImpl::new(player_repository.clone())),
        player_list_use_case: Box::new(ListPlayersUseCaseImpl::new(player_repository.clone())),
        player_toggle_use_case: Box::new(TogglePlayerUseCaseImpl::new(player_repository.clone())),
        player_migrate_names_use_case: Box::new(MigratePlayerNamesUseCaseImpl::new(
            player_repository.clone(),
        )),

        season_active_use_case: Box::new(GetActiveSeasonUseCaseImpl::new(
            season_repository.clone(),
        )),
        season_ensure_use_case: Box::new(EnsureSeasonUseCaseImpl::new(
            season_repository.clone(),
            player_repository.clone(),
            settings.league_name.clone(),
        )),
        season_new_use_case: Box::new(StartNewSeasonUseCaseImpl::new(
            season_repository.clone(),
            settings.league_name.clone(),
        )),
        season_history_use_case: Box::new(SeasonHistoryUseCaseImpl::new(
            season_repository.clone(),
        )),

        week_generate_use_case: Box::new(GenerateWeekUseCaseImpl::new(
            season_repository.clone(),
            player_repository.clone(),
            match_repository.clone(),
            pairing,
        )),
        week_get_use_case: Box::new(GetWeekUseCaseImpl::new(
            player_repository.clone(),
            match_repository.clone(),
        )),
        week_advance_use_case: Box::new(AdvanceWeekUseCaseImpl::new(
            season_repository.clone(),
            match_repository.clone(),
        )),

        result_record_use_case: Box::new(RecordResultUseCaseImpl::new(
            match_repository.clone(),
            persist_standings_workflow,
        )),
        standings_get_use_case: Box::new(GetStandingsUseCaseImpl::new(
            player_repository,
            match_repository,
        )),
    }
}
