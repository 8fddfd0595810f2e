use sleeptracker::core::scope::TaskScope;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[tokio::test]
async fn test_jobs_run_in_launch_order() {
    let scope = TaskScope::new("order");
    let seen = Arc::new(Mutex::new(Vec::new()));

    for i in 0..5 {
        let sink = seen.clone();
        scope.launch(async move {
            tokio::time::sleep(Duration::from_millis(5 - i)).await;
            sink.lock().unwrap().push(i);
        });
    }
    scope.settled().await;

    assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_dispose_cancels_every_guard() {
    let scope = TaskScope::new("cancel");
    let guard = scope.guard();
    let other = scope.guard();
    assert!(!guard.is_cancelled());

    scope.dispose();

    assert!(scope.is_disposed());
    assert!(guard.is_cancelled());
    assert!(other.is_cancelled());
    tokio::time::timeout(Duration::from_secs(1), guard.cancelled())
        .await
        .expect("guard resolves once disposed");
}

#[tokio::test]
async fn test_disposed_scope_ignores_new_work() {
    let scope = TaskScope::new("ignored");
    let ran = Arc::new(Mutex::new(false));
    scope.dispose();

    let flag = ran.clone();
    scope.launcher().launch(async move {
        *flag.lock().unwrap() = true;
    });
    tokio::time::timeout(Duration::from_secs(1), scope.settled())
        .await
        .expect("settled returns on a disposed scope");

    assert!(!*ran.lock().unwrap());
}

#[tokio::test]
async fn test_dispose_stops_a_running_job() {
    let scope = TaskScope::new("running");
    let finished = Arc::new(Mutex::new(false));

    let flag = finished.clone();
    scope.launch(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        *flag.lock().unwrap() = true;
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    scope.dispose();
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(!*finished.lock().unwrap());
}

#[tokio::test]
async fn test_spawned_task_observes_cancellation() {
    let scope = TaskScope::new("spawned");
    let stopped = Arc::new(Mutex::new(false));

    let guard = scope.guard();
    let flag = stopped.clone();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    tokio::spawn(async move {
        guard.cancelled().await;
        *flag.lock().unwrap() = true;
        let _ = tx.send(());
    });

    scope.dispose();
    tokio::time::timeout(Duration::from_secs(1), rx)
        .await
        .expect("task woke up")
        .expect("task reported");

    assert!(*stopped.lock().unwrap());
}
