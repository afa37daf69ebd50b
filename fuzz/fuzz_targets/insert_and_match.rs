#![no_main]
use fixroute::{Capture, Node, Router};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Vec<(String, i32)>, String, u8)| {
    let (routes, path, capacity) = data;

    let mut slots: Vec<Node<i32>> = std::iter::repeat_with(Node::default)
        .take(capacity.into())
        .collect();
    let mut router = Router::new(&mut slots);

    for (route, value) in &routes {
        let _ = router.insert(route, *value);
    }

    router.check_invariants().unwrap();

    let mut captures = [Capture::default(); 4];
    if let Ok(matched) = router.find(&path, &mut captures) {
        for capture in matched.captures() {
            assert!(!capture.value(&path).is_empty());
        }
    }
});
