//! End-to-end overlay behaviour: controller, navigation wiring, labels
//! and content rendering working together.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use slidenav_animation::{
    Easing, SurfaceAnimator, TargetOffset, TransitionCompleter, TransitionHandle,
    TransitionRequest, TransitionRunner, TransitionScheduler,
};
use slidenav_core::{
    LabelCatalog, Menu, MenuData, MenuEntry, NavItem, NavigationBus, NavigationSink,
    OverlayController, OverlayState, OverlayTimings, SlidenavConfig,
};
use tokio::sync::watch;

const WAIT: Duration = Duration::from_secs(5);

/// Runner whose transitions are resolved by the test
#[derive(Default)]
struct ManualRunner {
    pending: Mutex<Vec<(TransitionRequest, TransitionCompleter)>>,
    started: Mutex<Vec<TransitionRequest>>,
}

impl ManualRunner {
    fn pop(&self) -> Option<(TransitionRequest, TransitionCompleter)> {
        let mut pending = self.pending.lock().unwrap();
        if pending.is_empty() {
            None
        } else {
            Some(pending.remove(0))
        }
    }

    fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    fn started(&self) -> Vec<TransitionRequest> {
        self.started.lock().unwrap().clone()
    }
}

impl TransitionRunner for ManualRunner {
    fn animate_to(&self, request: TransitionRequest) -> TransitionHandle {
        let (completer, handle) = TransitionHandle::pair();
        self.started.lock().unwrap().push(request);
        self.pending.lock().unwrap().push((request, completer));
        handle
    }
}

fn setup() -> (Arc<ManualRunner>, Arc<OverlayController>) {
    let runner = Arc::new(ManualRunner::default());
    let controller = Arc::new(OverlayController::new(
        runner.clone(),
        OverlayTimings::default(),
    ));
    (runner, controller)
}

/// Wait until the runner has been asked for a transition
async fn next_transition(runner: &ManualRunner) -> (TransitionRequest, TransitionCompleter) {
    tokio::time::timeout(WAIT, async {
        loop {
            if let Some(pending) = runner.pop() {
                return pending;
            }
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("no transition was requested")
}

async fn wait_for_state(states: &mut watch::Receiver<OverlayState>, target: OverlayState) {
    tokio::time::timeout(WAIT, states.wait_for(|state| *state == target))
        .await
        .expect("state never reached")
        .expect("controller dropped");
}

/// Run a toggle to completion, resolving the transition it starts
async fn open(runner: &ManualRunner, controller: &Arc<OverlayController>) {
    let task = tokio::spawn({
        let controller = Arc::clone(controller);
        async move { controller.request_toggle().await }
    });
    next_transition(runner).await.1.complete();
    assert_eq!(task.await.unwrap(), OverlayState::Open);
}

#[tokio::test]
async fn toggle_from_closed_passes_through_opening() {
    let (runner, controller) = setup();
    let mut states = controller.watch_state();

    let task = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.request_toggle().await }
    });

    let (request, completer) = next_transition(&runner).await;
    assert_eq!(request.target, TargetOffset::OnScreen);
    assert_eq!(controller.state(), OverlayState::Opening);
    assert!(controller.is_mounted());
    wait_for_state(&mut states, OverlayState::Opening).await;

    completer.complete();
    assert_eq!(task.await.unwrap(), OverlayState::Open);
    assert_eq!(controller.state(), OverlayState::Open);
}

#[tokio::test]
async fn toggle_from_open_closes_and_unmounts() {
    let (runner, controller) = setup();
    open(&runner, &controller).await;

    let task = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.request_toggle().await }
    });

    let (request, completer) = next_transition(&runner).await;
    assert_eq!(request.target, TargetOffset::OffScreenUp);
    assert_eq!(controller.state(), OverlayState::Closing);
    assert!(controller.is_mounted());

    completer.complete();
    assert_eq!(task.await.unwrap(), OverlayState::Closed);
    assert!(!controller.is_mounted());
}

#[tokio::test]
async fn toggles_while_pending_never_overlap() {
    let (runner, controller) = setup();

    let task = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.request_toggle().await }
    });
    let (_, completer) = next_transition(&runner).await;

    for _ in 0..10 {
        assert_eq!(controller.request_toggle().await, OverlayState::Opening);
        assert_eq!(controller.request_close().await, OverlayState::Opening);
    }
    assert_eq!(runner.pending_count(), 0);
    assert_eq!(controller.transition_count(), 1);

    completer.complete();
    assert_eq!(task.await.unwrap(), OverlayState::Open);
    assert_eq!(runner.started().len(), 1);
}

#[tokio::test]
async fn double_close_runs_one_transition() {
    let (runner, controller) = setup();
    open(&runner, &controller).await;

    let first = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.request_close().await }
    });
    let (_, completer) = next_transition(&runner).await;

    assert_eq!(controller.request_close().await, OverlayState::Closing);
    assert_eq!(runner.pending_count(), 0);

    completer.complete();
    assert_eq!(first.await.unwrap(), OverlayState::Closed);
    // One enter, one exit
    assert_eq!(controller.transition_count(), 2);
}

#[tokio::test]
async fn close_on_closed_is_noop() {
    let (runner, controller) = setup();
    assert_eq!(controller.request_close().await, OverlayState::Closed);
    assert_eq!(
        controller.on_external_navigation_start().await,
        OverlayState::Closed
    );
    assert!(runner.started().is_empty());
}

#[tokio::test]
async fn navigation_start_closes_open_overlay() {
    let (runner, controller) = setup();
    let bus = NavigationBus::new();
    controller.attach_navigation(&bus).unwrap();
    let mut states = controller.watch_state();

    open(&runner, &controller).await;

    bus.navigate("/letters");
    let (request, completer) = next_transition(&runner).await;
    assert_eq!(request.target, TargetOffset::OffScreenUp);
    wait_for_state(&mut states, OverlayState::Closing).await;

    completer.complete();
    wait_for_state(&mut states, OverlayState::Closed).await;
    assert!(!controller.is_mounted());
}

#[tokio::test]
async fn navigation_while_closed_starts_nothing() {
    let (runner, controller) = setup();
    let bus = NavigationBus::new();
    controller.attach_navigation(&bus).unwrap();

    bus.navigate("/about");
    bus.navigate("/letters");
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    assert_eq!(controller.state(), OverlayState::Closed);
    assert!(runner.started().is_empty());
}

#[tokio::test]
async fn navigation_while_opening_is_absorbed() {
    let (runner, controller) = setup();
    let bus = NavigationBus::new();
    controller.attach_navigation(&bus).unwrap();

    let task = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.request_toggle().await }
    });
    let (_, completer) = next_transition(&runner).await;
    assert_eq!(controller.state(), OverlayState::Opening);

    // The close lands while the enter transition runs and is dropped
    bus.navigate("/letters");
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert_eq!(controller.state(), OverlayState::Opening);
    assert_eq!(runner.pending_count(), 0);

    completer.complete();
    assert_eq!(task.await.unwrap(), OverlayState::Open);
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    assert_eq!(controller.state(), OverlayState::Open);
    assert_eq!(controller.transition_count(), 1);
    assert_eq!(runner.started().len(), 1);
}

#[tokio::test]
async fn repeated_navigation_during_close_is_absorbed() {
    let (runner, controller) = setup();
    let bus = NavigationBus::new();
    controller.attach_navigation(&bus).unwrap();
    let mut states = controller.watch_state();
    open(&runner, &controller).await;

    bus.navigate("/a");
    let (_, completer) = next_transition(&runner).await;
    bus.navigate("/b");
    bus.navigate("/c");

    completer.complete();
    wait_for_state(&mut states, OverlayState::Closed).await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    assert_eq!(controller.state(), OverlayState::Closed);
    assert_eq!(runner.started().len(), 2);
}

#[tokio::test]
async fn activating_a_link_closes_the_menu() {
    let (runner, controller) = setup();
    let bus = Arc::new(NavigationBus::new());
    controller.attach_navigation(bus.as_ref()).unwrap();
    let mut states = controller.watch_state();

    let controller = Arc::try_unwrap(controller).ok().expect("controller still shared");
    let menu = Menu::new(
        controller,
        MenuData::new("Dear reader", vec![NavItem::new("porto", "Porto")]),
        &LabelCatalog::builtin(),
        "en",
        bus.clone() as Arc<dyn NavigationSink>,
    );

    let toggle = menu.toggle();
    let resolve = async {
        next_transition(&runner).await.1.complete();
    };
    let (state, _) = tokio::join!(toggle, resolve);
    assert_eq!(state, OverlayState::Open);

    let view = menu.view().unwrap();
    menu.activate(view.link_to("/porto").unwrap());
    next_transition(&runner).await.1.complete();
    wait_for_state(&mut states, OverlayState::Closed).await;

    assert_eq!(bus.history(), vec!["/porto"]);
    assert!(menu.view().is_none());
}

#[tokio::test]
async fn empty_items_render_about_and_letter_only() {
    let (runner, controller) = setup();
    let controller = Arc::try_unwrap(controller).ok().expect("controller still shared");
    let data = MenuData::from_json_str(r#"{ "aLetterFrom": "Dear reader", "menuItems": [] }"#)
        .unwrap();
    let menu = Menu::new(
        controller,
        data,
        &LabelCatalog::builtin(),
        "en",
        Arc::new(NavigationBus::new()),
    );

    let resolve = async {
        next_transition(&runner).await.1.complete();
    };
    tokio::join!(menu.toggle(), resolve);

    let view = menu.view().unwrap();
    assert_eq!(view.links().count(), 1);
    assert_eq!(view.links().next().unwrap().label, "About");
    assert_eq!(view.links().next().unwrap().path, "/about");
    assert_eq!(
        view.entries()[1],
        MenuEntry::Heading("Dear reader".to_string())
    );
}

#[tokio::test]
async fn french_toggle_label() {
    let (runner, controller) = setup();
    let controller = Arc::try_unwrap(controller).ok().expect("controller still shared");
    let menu = Menu::new(
        controller,
        MenuData::default(),
        &LabelCatalog::builtin(),
        "fr",
        Arc::new(NavigationBus::new()),
    );
    assert_eq!(menu.toggle_label(), "Menu");

    let resolve = async {
        next_transition(&runner).await.1.complete();
    };
    tokio::join!(menu.toggle(), resolve);
    assert_eq!(menu.toggle_label(), "Fermer");
    assert_eq!(menu.view().unwrap().links().next().unwrap().label, "À Propos");
}

#[tokio::test]
async fn unknown_locale_uses_default_labels() {
    let (_, controller) = setup();
    let controller = Arc::try_unwrap(controller).ok().expect("controller still shared");
    let menu = Menu::new(
        controller,
        MenuData::default(),
        &LabelCatalog::builtin(),
        "ja",
        Arc::new(NavigationBus::new()),
    );
    assert_eq!(menu.toggle_label(), "Menu");
    assert_eq!(menu.labels().close, "Close");
}

#[tokio::test]
async fn scheduler_backed_overlay_moves_surface() {
    let config = SlidenavConfig::from_toml_str(
        r#"
        [enter]
        duration_ms = 20
        easing = "power2.out"

        [exit]
        duration_ms = 20
        easing = "power2.in"
        "#,
    )
    .unwrap();

    let mut scheduler = TransitionScheduler::new();
    scheduler.start_background();
    let animator =
        Arc::new(SurfaceAnimator::new(scheduler.handle(), TargetOffset::OffScreenUp).unwrap());
    let controller = OverlayController::new(animator.clone(), config.timings());
    assert_eq!(controller.timings().exit.easing, Easing::Power2In);

    let state = tokio::time::timeout(WAIT, controller.request_toggle())
        .await
        .unwrap();
    assert_eq!(state, OverlayState::Open);
    assert_eq!(animator.offset(), Some(0.0));

    let state = tokio::time::timeout(WAIT, controller.request_toggle())
        .await
        .unwrap();
    assert_eq!(state, OverlayState::Closed);
    assert_eq!(animator.offset(), Some(-100.0));
    assert_eq!(controller.transition_count(), 2);
}

#[tokio::test]
async fn dropped_scheduler_rolls_back_opening() {
    let scheduler = TransitionScheduler::new();
    let animator = SurfaceAnimator::new(scheduler.handle(), TargetOffset::OffScreenUp).unwrap();
    let controller = OverlayController::new(Arc::new(animator), OverlayTimings::default());
    drop(scheduler);

    assert_eq!(controller.request_toggle().await, OverlayState::Closed);
    assert_eq!(controller.transition_count(), 1);
}

/// Yield until the animator has picked up a transition
async fn wait_until_animating(animator: &SurfaceAnimator) {
    tokio::time::timeout(WAIT, async {
        while !animator.is_animating() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("no transition was started");
}

#[tokio::test]
async fn cancelled_close_reports_open_with_surface_left_in_place() {
    let scheduler = TransitionScheduler::new();
    let animator =
        Arc::new(SurfaceAnimator::new(scheduler.handle(), TargetOffset::OffScreenUp).unwrap());
    let controller = Arc::new(OverlayController::new(
        animator.clone(),
        OverlayTimings::default(),
    ));

    let task = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.request_toggle().await }
    });
    wait_until_animating(&animator).await;
    scheduler.advance(700);
    assert_eq!(task.await.unwrap(), OverlayState::Open);

    let task = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.request_close().await }
    });
    wait_until_animating(&animator).await;
    scheduler.advance(350);
    assert!(animator.cancel());

    assert_eq!(task.await.unwrap(), OverlayState::Open);
    let offset = animator.offset().unwrap();
    assert!(offset < 0.0 && offset > -100.0, "offset {offset}");

    // Another close starts from wherever the surface was left
    let task = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.request_close().await }
    });
    wait_until_animating(&animator).await;
    scheduler.advance(700);
    assert_eq!(task.await.unwrap(), OverlayState::Closed);
    assert_eq!(animator.offset(), Some(-100.0));
    assert_eq!(controller.transition_count(), 3);
}
