use report_desk::window::{PxSize, WindowManager};

// On a 1280x800 viewport the first window opens at (80, 60) sized 896x600,
// so its header band spans y 60..92 and its resize grip corner is (976, 660).

fn desk() -> WindowManager<&'static str> {
    let mut wm = WindowManager::new(PxSize::new(1280, 800));
    wm.open_window("sales", "Sales", "https://bi.example/embed/sales");
    wm
}

#[test]
fn header_drag_follows_the_pointer() {
    let mut wm = desk();
    let id = wm.active_window().unwrap();

    assert!(wm.pointer_pressed(300, 70));
    assert!(wm.pointer_moved(340, 95));
    assert!(wm.pointer_released());

    let rect = wm.window(id).unwrap().geometry();
    assert_eq!((rect.x, rect.y), (120, 85));
    assert!(!wm.pointer_moved(400, 120), "released drags stop tracking");
}

#[test]
fn drag_cannot_push_the_window_out_of_reach() {
    let mut wm = desk();
    let id = wm.active_window().unwrap();

    assert!(wm.pointer_pressed(300, 70));
    wm.pointer_moved(-5000, -5000);
    let rect = wm.window(id).unwrap().geometry();
    assert_eq!((rect.x, rect.y), (0, 0));

    wm.pointer_moved(5000, 5000);
    let rect = wm.window(id).unwrap().geometry();
    // 100px of chrome stays on screen on each axis
    assert_eq!((rect.x, rect.y), (1180, 700));
    wm.pointer_released();
}

#[test]
fn corner_resize_grows_and_floors_at_the_minimum() {
    let mut wm = desk();
    let id = wm.active_window().unwrap();

    assert!(wm.pointer_pressed(972, 652));
    wm.pointer_moved(1072, 752);
    let rect = wm.window(id).unwrap().geometry();
    assert_eq!((rect.width, rect.height), (996, 700));

    wm.pointer_moved(-4000, -4000);
    let rect = wm.window(id).unwrap().geometry();
    assert_eq!((rect.width, rect.height), (400, 300));
    assert_eq!((rect.x, rect.y), (80, 60), "resize never moves the origin");
    wm.pointer_released();
}

#[test]
fn resize_press_does_not_steal_focus() {
    let mut wm = WindowManager::new(PxSize::new(1280, 800));
    let a = wm.open_window("a", "A", "src").unwrap();
    let b = wm.open_window("b", "B", "src").unwrap();
    wm.focus_window(a);

    // b sits at (110, 90) sized 896x600; its grip corner lies outside a.
    assert!(wm.pointer_pressed(1002, 684));
    assert_eq!(wm.active_window(), Some(a), "grip press must not refocus");

    wm.pointer_moved(1010, 690);
    let rect = wm.window(b).unwrap().geometry();
    assert_eq!((rect.width, rect.height), (904, 606));
    wm.pointer_released();
}

#[test]
fn maximize_fills_the_viewport_and_escape_restores() {
    let mut wm = desk();
    let id = wm.active_window().unwrap();
    let before = wm.window(id).unwrap().geometry();

    wm.toggle_maximize(id);
    let maxed = wm.window(id).unwrap().geometry();
    assert_eq!((maxed.x, maxed.y), (0, 0));
    assert_eq!((maxed.width, maxed.height), (1280, 800));
    assert!(wm.window(id).unwrap().is_maximized());

    assert!(wm.escape_pressed());
    assert_eq!(wm.window(id).unwrap().geometry(), before);
    assert!(!wm.escape_pressed(), "second escape has nothing to restore");
}

#[test]
fn double_click_on_the_header_toggles_maximize() {
    let mut wm = desk();
    let id = wm.active_window().unwrap();

    assert!(wm.pointer_pressed(300, 70));
    assert!(wm.pointer_released());
    assert!(wm.pointer_pressed(300, 70));
    assert!(wm.window(id).unwrap().is_maximized());
    assert!(!wm.pointer_moved(400, 200), "the second press starts no drag");

    // While maximized the header is inert for dragging.
    assert!(wm.pointer_pressed(300, 16));
    assert!(!wm.pointer_moved(500, 300));
    assert!(wm.window(id).unwrap().is_maximized());
}

#[test]
fn slow_second_press_on_the_header_does_not_maximize() {
    let mut wm = desk();
    let id = wm.active_window().unwrap();

    assert!(wm.pointer_pressed(300, 70));
    assert!(wm.pointer_released());
    // 500ms is the pairing window; wait it out before pressing again
    std::thread::sleep(std::time::Duration::from_millis(600));
    assert!(wm.pointer_pressed(300, 70));
    assert!(!wm.window(id).unwrap().is_maximized());
    assert!(wm.pointer_moved(320, 90), "the slow press starts a fresh drag");
    wm.pointer_released();
}

#[test]
fn cascade_places_windows_in_a_stagger() {
    let mut wm = WindowManager::new(PxSize::new(1280, 800));
    for key in ["a", "b", "c"] {
        wm.open_window(key, key, "src");
    }
    let positions: Vec<(i32, i32)> = wm
        .stacking_order()
        .iter()
        .map(|id| {
            let rect = wm.window(*id).unwrap().geometry();
            (rect.x, rect.y)
        })
        .collect();
    assert_eq!(positions, vec![(80, 60), (110, 90), (140, 120)]);
}

#[test]
fn cascade_wraps_back_to_the_origin_on_narrow_viewports() {
    let mut wm = WindowManager::new(PxSize::new(700, 4000));
    wm.set_max_windows(10);
    let mut last = None;
    for key in ["a", "b", "c", "d", "e", "f"] {
        last = wm.open_window(key, key, "src");
    }
    let rect = wm.window(last.unwrap()).unwrap().geometry();
    assert_eq!(
        (rect.x, rect.y),
        (80, 60),
        "sixth window restarts the cascade"
    );
}
