use super::*;
use std::sync::atomic::AtomicUsize;
use std::time::Duration;

use s2gos_core::{Arguments, ProcessFunction, ProcessRegistry, RegisterOptions};
use s2gos_protocols::JobStatus;

fn sleeper(millis: u64, active: Arc<AtomicUsize>, peak: Arc<AtomicUsize>) -> ProcessFunction {
    ProcessFunction::builder("tests::sleeper").body(move |_ctx, _args| {
        let now = active.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(millis));
        active.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    })
}

fn make_job(id: &str, function: ProcessFunction) -> Arc<Job> {
    let entry = ProcessRegistry::new()
        .register(function, RegisterOptions::new().with_id("sleeper"))
        .unwrap();
    Job::new(id, &entry, Arguments::default())
}

async fn wait_terminal(job: &Job) {
    for _ in 0..500 {
        if job.status().is_terminal() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {} did not finish", job.job_id());
}

#[test]
fn test_worker_pool_new() {
    let pool = WorkerPool::new(PoolConfig::default().with_max_workers(4));
    assert!(!pool.is_closed());
    assert_eq!(pool.available_workers(), 4);
    assert_eq!(pool.stats().max_workers, 4);
}

#[test]
fn test_zero_workers_still_runs_one() {
    let pool = WorkerPool::new(PoolConfig::default().with_max_workers(0));
    assert_eq!(pool.available_workers(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_submit_runs_job() {
    let pool = WorkerPool::new(PoolConfig::default());
    let job = make_job(
        "job_0",
        ProcessFunction::builder("tests::one").body(|_ctx, _args| Ok(1)),
    );
    pool.submit(job.clone()).unwrap();
    wait_terminal(&job).await;
    assert_eq!(job.status(), JobStatus::Successful);

    tokio::time::sleep(Duration::from_millis(20)).await;
    let stats = pool.stats();
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.running, 0);
    assert_eq!(stats.queued, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_pool_bounds_concurrency() {
    let pool = WorkerPool::new(PoolConfig::default().with_max_workers(2));
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let jobs: Vec<Arc<Job>> = (0..5)
        .map(|i| {
            make_job(
                &format!("job_{}", i),
                sleeper(100, active.clone(), peak.clone()),
            )
        })
        .collect();
    for job in &jobs {
        pool.submit(job.clone()).unwrap();
    }
    for job in &jobs {
        wait_terminal(job).await;
        assert_eq!(job.status(), JobStatus::Successful);
    }
    assert!(peak.load(Ordering::SeqCst) <= 2);
    assert!(peak.load(Ordering::SeqCst) >= 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_shutdown_dismisses_queued_jobs() {
    let pool = WorkerPool::new(PoolConfig::default().with_max_workers(1));
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let first = make_job("job_0", sleeper(300, active.clone(), peak.clone()));
    let second = make_job("job_1", sleeper(300, active.clone(), peak.clone()));
    pool.submit(first.clone()).unwrap();
    pool.submit(second.clone()).unwrap();

    for _ in 0..100 {
        if first.status() == JobStatus::Running || second.status() == JobStatus::Running {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    pool.shutdown();

    wait_terminal(&first).await;
    wait_terminal(&second).await;
    let mut statuses = vec![first.status(), second.status()];
    statuses.sort_by_key(|s| s.as_str());
    assert_eq!(statuses, vec![JobStatus::Dismissed, JobStatus::Successful]);

    let late = make_job(
        "job_2",
        ProcessFunction::builder("tests::late").body(|_ctx, _args| Ok(())),
    );
    assert_eq!(pool.submit(late), Err(PoolError::ShutDown));
}
