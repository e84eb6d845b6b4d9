#![allow(missing_docs)]

use flappy_evo::config::RunConfig;
use flappy_evo::game::flappy::FlappyGame;
use flappy_evo::game::params::GameParams;
use flappy_evo::neat::snapshot::PopulationSnapshot;
use flappy_evo::{EpisodeRunner, Environment, NeatConfig, NeatError, Population};

fn create_test_config() -> NeatConfig {
    NeatConfig {
        population_size: 16,
        ..NeatConfig::default()
    }
}

#[test]
fn test_generations_on_flappy_game() {
    let mut population = Population::with_seed(create_test_config(), 11).unwrap();
    let mut game = FlappyGame::new(GameParams::default(), 12).unwrap();
    let runner = EpisodeRunner::new(600);

    for expected in 0..5 {
        let report = runner.run_generation(&mut population, &mut game).unwrap();

        assert_eq!(report.generation, expected);
        assert!(report.frames <= 600);
        assert!(report.best_fitness >= report.mean_fitness);
        assert!(report.best_score <= report.frames as f32);
        if report.survivors > 0 {
            assert_eq!(report.frames, 600);
        }
    }

    assert_eq!(population.generation(), 5);
    assert_eq!(population.members().len(), 16);
    assert_eq!(population.history().len(), 5);
}

#[test]
fn test_episode_results_cover_every_agent() {
    let population = Population::with_seed(create_test_config(), 3).unwrap();
    let mut game = FlappyGame::new(GameParams::default(), 4).unwrap();

    let results = EpisodeRunner::new(300)
        .run_episode(&population, &mut game)
        .unwrap();

    assert_eq!(results.len(), 16);
    for (result, bird) in results.iter().zip(game.birds()) {
        assert_eq!(result.alive, bird.alive);
        assert_eq!(result.score, bird.frames_survived as f32);
        assert!(result.score <= game.frame() as f32);
    }
}

#[test]
fn test_same_seeds_replay_identically() {
    let run = || {
        let mut population = Population::with_seed(create_test_config(), 21).unwrap();
        let mut game = FlappyGame::new(GameParams::default(), 22).unwrap();
        let runner = EpisodeRunner::new(400);
        (0..3)
            .map(|_| runner.run_generation(&mut population, &mut game).unwrap())
            .collect::<Vec<_>>()
    };

    assert_eq!(run(), run());
}

#[test]
fn test_snapshot_file_round_trip() {
    let mut population = Population::with_seed(create_test_config(), 8).unwrap();
    let mut game = FlappyGame::new(GameParams::default(), 9).unwrap();
    EpisodeRunner::new(200)
        .run_generation(&mut population, &mut game)
        .unwrap();

    let path = std::env::temp_dir().join("flappy_evo_snapshot_test.json");
    PopulationSnapshot::capture(&population)
        .save_to_file(&path)
        .unwrap();

    let json = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["generation"], 1);
    assert_eq!(parsed["members"].as_array().unwrap().len(), 16);

    let restored = PopulationSnapshot::load_from_file(&path)
        .unwrap()
        .into_population(1)
        .unwrap();
    assert_eq!(restored.generation(), 1);
    assert_eq!(restored.members().len(), 16);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_run_config_file_round_trip() {
    let path = std::env::temp_dir().join("flappy_evo_config_test.json");
    let config = RunConfig {
        generations: 7,
        seed: Some(5),
        ..RunConfig::default()
    };
    config.save_to_file(&path).unwrap();

    let loaded = RunConfig::from_json_file(&path).unwrap();
    assert_eq!(loaded, config);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_missing_files_report_io_errors() {
    let path = std::env::temp_dir().join("flappy_evo_missing_test.json");
    let _ = std::fs::remove_file(&path);

    assert!(matches!(
        PopulationSnapshot::load_from_file(&path),
        Err(NeatError::Io(_))
    ));
    assert!(matches!(
        RunConfig::from_json_file(&path),
        Err(NeatError::Io(_))
    ));
}

#[test]
fn test_malformed_files_report_json_errors() {
    let path = std::env::temp_dir().join("flappy_evo_malformed_test.json");
    std::fs::write(&path, "{ \"generation\": 3, ").unwrap();

    let snapshot = PopulationSnapshot::load_from_file(&path);
    let config = RunConfig::from_json_file(&path);
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(snapshot, Err(NeatError::Json(_))));
    assert!(matches!(config, Err(NeatError::Json(_))));
}
