use nalgebra::Point2;
use rstest::rstest;
use swarm_nav::{
    ContinuousScenario, FitnessEvaluator, Obstacle, PenalizedContinuousFitness, SwarmConfig,
    Termination, UpdateSchedule,
};

fn single_obstacle() -> PenalizedContinuousFitness {
    PenalizedContinuousFitness::new(vec![Obstacle::new(Point2::origin(), 2.0).unwrap()])
}

#[test]
fn center_of_obstacle_is_fully_penalized() {
    let fitness = single_obstacle();
    let origin = Point2::origin();

    assert_eq!(fitness.penalty(&origin), 2000.0);
    assert_eq!(fitness.evaluate(&[0.0, 0.0]), fitness.base(&origin) + 2000.0);
}

#[rstest]
#[case(2.0, 0.0)]
#[case(0.0, -2.0)]
#[case(-2.0, 0.0)]
#[case(5.0, 5.0)]
fn rim_and_outside_carry_no_penalty(#[case] x: f64, #[case] y: f64) {
    let fitness = single_obstacle();
    let point = Point2::new(x, y);
    assert_eq!(fitness.penalty(&point), 0.0);
    assert_eq!(fitness.evaluate(&[x, y]), fitness.base(&point));
}

#[test]
fn penalty_grows_with_depth_and_overlap() {
    let fitness = single_obstacle();
    assert_eq!(fitness.penalty(&Point2::new(1.0, 0.0)), 1000.0);
    assert!(fitness.penalty(&Point2::new(0.5, 0.0)) > fitness.penalty(&Point2::new(1.5, 0.0)));

    let stacked = PenalizedContinuousFitness::new(vec![
        Obstacle::new(Point2::origin(), 1.0).unwrap(),
        Obstacle::new(Point2::origin(), 2.0).unwrap(),
    ]);
    assert_eq!(stacked.penalty(&Point2::origin()), 3000.0);

    let dot = PenalizedContinuousFitness::new(vec![Obstacle::new(Point2::origin(), 0.0).unwrap()]);
    assert_eq!(dot.penalty(&Point2::origin()), 0.0);
}

#[test]
fn reference_run_stays_in_bounds() {
    let scenario = ContinuousScenario {
        swarm: SwarmConfig {
            seed: Some(7),
            ..ContinuousScenario::default().swarm
        },
        ..ContinuousScenario::default()
    };
    let outcome = scenario.run().unwrap();

    assert_eq!(outcome.result.termination, Termination::Completed);
    assert_eq!(outcome.result.iterations, 100);
    assert!((-10.0..=10.0).contains(&outcome.point.x));
    assert!((-10.0..=10.0).contains(&outcome.point.y));
    assert!((outcome.result.best_score - (outcome.base + outcome.penalty)).abs() < 1e-9);
    assert!(
        outcome
            .result
            .history
            .windows(2)
            .all(|w| w[1].best_score <= w[0].best_score)
    );
}

#[test]
fn synchronous_schedule_also_runs() {
    let scenario = ContinuousScenario {
        swarm: SwarmConfig {
            schedule: UpdateSchedule::Synchronous,
            parallel: true,
            iterations: 40,
            seed: Some(3),
            ..ContinuousScenario::default().swarm
        },
        ..ContinuousScenario::default()
    };
    let outcome = scenario.run().unwrap();
    assert_eq!(outcome.result.history.len(), 40);
    assert!(outcome.result.best_score.is_finite());
}

#[test]
fn sample_config_file_matches_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/continuous.yaml");
    let scenario = ContinuousScenario::from_yaml_file(path).unwrap();
    let reference = ContinuousScenario::default();

    assert_eq!(scenario.bounds, reference.bounds);
    assert_eq!(scenario.obstacles, reference.obstacles);
    assert_eq!(scenario.target, reference.target);
    assert_eq!(scenario.swarm.schedule, UpdateSchedule::Asynchronous);
    assert_eq!(scenario.swarm.rule, reference.swarm.rule);
    assert_eq!(scenario.swarm.seed, Some(7));
}
