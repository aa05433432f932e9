use karst_store::WorkQueue;
use karst_world::ChunkCoord;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Push(i32, i32, i32),
    Pop,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (-32i32..=32, -32i32..=32, -32i32..=32).prop_map(|(x, y, z)| Op::Push(x, y, z)),
        2 => Just(Op::Pop),
    ]
}

proptest! {
    // The queue behaves like an unordered bag with min-distance removal:
    // length is exactly pushes minus pops, and every pop returns a
    // coordinate at the bag's minimum distance from the centre.
    #[test]
    fn queue_matches_a_bag_model(
        ops in proptest::collection::vec(op(), 0..200),
        centre in (-8i32..=8, -8i32..=8, -8i32..=8),
    ) {
        let centre = ChunkCoord::new(centre.0, centre.1, centre.2);
        let q = WorkQueue::new();
        let mut model: Vec<ChunkCoord> = Vec::new();

        for op in ops {
            match op {
                Op::Push(x, y, z) => {
                    let c = ChunkCoord::new(x, y, z);
                    prop_assert!(q.push(c));
                    model.push(c);
                }
                Op::Pop => match q.pop_nearest(centre) {
                    None => prop_assert!(model.is_empty()),
                    Some(c) => {
                        let best = model
                            .iter()
                            .map(|m| centre.distance_sq(*m))
                            .min()
                            .expect("queue returned an item the model lacks");
                        prop_assert_eq!(centre.distance_sq(c), best);
                        let idx = model
                            .iter()
                            .position(|m| *m == c)
                            .expect("popped coordinate was never pushed");
                        model.swap_remove(idx);
                    }
                },
            }
            prop_assert_eq!(q.len(), model.len());
        }
    }
}
