//! Dependency wiring
//!
//! Turns a stage selection into the ordered task list of the execution DAG.
//! Tasks are emitted in dependency order, so every prerequisite precedes the
//! task naming it and no topological sort is needed.

use std::collections::HashSet;

use crate::argo::types::{Arguments, DagTask, Parameter};
use crate::domain::stage::StageKind;
use crate::error::{CompileError, Result};

use super::selector::StageSelection;

/// Input parameter carrying the master's pod address
pub const MASTER_IP_PARAM: &str = "master-ip";

/// Name of the `index`-th slave task, 1-based
pub fn slave_task_name(index: u32) -> String {
    format!("{}-{:03}", StageKind::LoadTestsSlave.template_name(), index)
}

pub fn wire(selection: &StageSelection) -> Vec<DagTask> {
    let mut tasks = Vec::new();
    let pre_start = StageKind::PreStart.template_name();
    let master = StageKind::LoadTestsMaster.template_name();

    if selection.contains(StageKind::PreStart) {
        tasks.push(task(StageKind::PreStart, pre_start.to_string(), vec![], None));
    }

    if selection.has_load_tests() {
        let mut dependencies = Vec::new();
        if selection.contains(StageKind::PreStart) {
            dependencies.push(pre_start.to_string());
        }
        tasks.push(task(
            StageKind::LoadTestsMaster,
            master.to_string(),
            dependencies,
            None,
        ));

        for index in 1..=selection.slave_count() {
            tasks.push(task(
                StageKind::LoadTestsSlave,
                slave_task_name(index),
                vec![master.to_string()],
                Some(master_ip_argument()),
            ));
        }
    }

    if selection.contains(StageKind::Monitoring) {
        let mut dependencies = Vec::new();
        if selection.contains(StageKind::PreStart) {
            dependencies.push(pre_start.to_string());
        }
        // Monitoring coordinates against the running master
        let arguments = if selection.has_load_tests() {
            dependencies.push(master.to_string());
            Some(master_ip_argument())
        } else {
            None
        };
        tasks.push(task(
            StageKind::Monitoring,
            StageKind::Monitoring.template_name().to_string(),
            dependencies,
            arguments,
        ));
    }

    // post-stop runs as the exit handler, outside the DAG

    tasks
}

/// Check that task names are unique and each dependency names an earlier task
pub fn verify(tasks: &[DagTask]) -> Result<()> {
    let mut seen = HashSet::new();

    for task in tasks {
        for dependency in &task.dependencies {
            if !seen.contains(dependency.as_str()) {
                return Err(CompileError::Invariant(format!(
                    "task `{}` depends on `{}` which is not emitted before it",
                    task.name, dependency
                )));
            }
        }
        if !seen.insert(task.name.as_str()) {
            return Err(CompileError::Invariant(format!(
                "duplicate task name `{}`",
                task.name
            )));
        }
    }

    Ok(())
}

fn task(
    kind: StageKind,
    name: String,
    dependencies: Vec<String>,
    arguments: Option<Arguments>,
) -> DagTask {
    DagTask {
        name,
        template: kind.template_name().to_string(),
        dependencies,
        arguments,
    }
}

fn master_ip_argument() -> Arguments {
    Arguments {
        parameters: vec![Parameter::with_value(
            MASTER_IP_PARAM,
            format!("{{{{tasks.{}.ip}}}}", StageKind::LoadTestsMaster.template_name()),
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::selector::select;
    use crate::compiler::tests::{load_tests, request};
    use crate::domain::workflow::{MonitoringJob, PostStopJob, PreStartJob};

    fn names(tasks: &[DagTask]) -> Vec<&str> {
        tasks.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_slave_task_name_padding() {
        assert_eq!(slave_task_name(1), "load-tests-slave-001");
        assert_eq!(slave_task_name(42), "load-tests-slave-042");
        assert_eq!(slave_task_name(999), "load-tests-slave-999");
    }

    #[test]
    fn test_empty_selection_has_no_tasks() {
        assert!(wire(&select(&request()).unwrap()).is_empty());
    }

    #[test]
    fn test_load_tests_fan_out() {
        let mut req = request();
        req.job_load_tests = Some(load_tests(3, 30));

        let tasks = wire(&select(&req).unwrap());
        assert_eq!(
            names(&tasks),
            vec![
                "load-tests-master",
                "load-tests-slave-001",
                "load-tests-slave-002",
                "load-tests-slave-003",
            ]
        );
        assert!(tasks[0].dependencies.is_empty());
        for slave in &tasks[1..] {
            assert_eq!(slave.template, "load-tests-slave");
            assert_eq!(slave.dependencies, vec!["load-tests-master"]);
            let argument = &slave.arguments.as_ref().unwrap().parameters[0];
            assert_eq!(argument.name, MASTER_IP_PARAM);
            assert_eq!(
                argument.value.as_deref(),
                Some("{{tasks.load-tests-master.ip}}")
            );
        }
    }

    #[test]
    fn test_pre_start_gates_master_and_monitoring() {
        let mut req = request();
        req.job_pre_start = Some(PreStartJob::default());
        req.job_monitoring = Some(MonitoringJob::default());
        req.job_load_tests = Some(load_tests(1, 5));

        let tasks = wire(&select(&req).unwrap());
        assert_eq!(
            names(&tasks),
            vec![
                "pre-start",
                "load-tests-master",
                "load-tests-slave-001",
                "monitoring"
            ]
        );
        assert!(tasks[0].dependencies.is_empty());
        assert_eq!(tasks[1].dependencies, vec!["pre-start"]);
        assert_eq!(tasks[3].dependencies, vec!["pre-start", "load-tests-master"]);
        assert!(tasks[3].arguments.is_some());
    }

    #[test]
    fn test_monitoring_alone() {
        let mut req = request();
        req.job_monitoring = Some(MonitoringJob::default());

        let tasks = wire(&select(&req).unwrap());
        assert_eq!(names(&tasks), vec!["monitoring"]);
        assert!(tasks[0].dependencies.is_empty());
        assert!(tasks[0].arguments.is_none());
    }

    #[test]
    fn test_post_stop_is_not_a_task() {
        let mut req = request();
        req.job_post_stop = Some(PostStopJob::default());
        assert!(wire(&select(&req).unwrap()).is_empty());
    }

    #[test]
    fn test_wired_graphs_verify() {
        let mut req = request();
        req.job_pre_start = Some(PreStartJob::default());
        req.job_monitoring = Some(MonitoringJob::default());
        req.job_load_tests = Some(load_tests(25, 250));

        assert_eq!(verify(&wire(&select(&req).unwrap())), Ok(()));
    }

    #[test]
    fn test_verify_rejects_forward_reference() {
        let tasks = vec![
            task(
                StageKind::Monitoring,
                "monitoring".to_string(),
                vec!["load-tests-master".to_string()],
                None,
            ),
            task(
                StageKind::LoadTestsMaster,
                "load-tests-master".to_string(),
                vec![],
                None,
            ),
        ];
        assert!(matches!(verify(&tasks), Err(CompileError::Invariant(_))));
    }

    #[test]
    fn test_verify_rejects_self_reference() {
        let tasks = vec![task(
            StageKind::PreStart,
            "pre-start".to_string(),
            vec!["pre-start".to_string()],
            None,
        )];
        assert!(matches!(verify(&tasks), Err(CompileError::Invariant(_))));
    }

    #[test]
    fn test_verify_rejects_duplicates() {
        let tasks = vec![
            task(StageKind::PreStart, "pre-start".to_string(), vec![], None),
            task(StageKind::PreStart, "pre-start".to_string(), vec![], None),
        ];
        assert!(matches!(verify(&tasks), Err(CompileError::Invariant(_))));
    }
}
