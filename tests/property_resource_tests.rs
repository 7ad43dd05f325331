use grapher_rs::api::{EngineLease, EngineResourceManager};
use grapher_rs::core::Viewport;
use grapher_rs::engine::{
    EngineCall, NullEngine, NullEngineFactory, RenderCapability, SurfaceDescriptor, SurfaceId,
};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Op {
    Acquire(usize),
    ReleaseViaManager(usize),
    ReleaseViaLease(usize),
    DropLease(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..3).prop_map(Op::Acquire),
        (0usize..3).prop_map(Op::ReleaseViaManager),
        (0usize..3).prop_map(Op::ReleaseViaLease),
        (0usize..3).prop_map(Op::DropLease),
    ]
}

fn surface(slot: usize) -> SurfaceDescriptor {
    SurfaceDescriptor::new(format!("#surface-{slot}"), Viewport::new(320, 240))
        .with_capability(RenderCapability::WebGl2)
}

proptest! {
    #[test]
    fn at_most_one_live_engine_per_surface_and_no_double_release(
        ops in prop::collection::vec(op_strategy(), 1..64)
    ) {
        let factory = NullEngineFactory::new();
        let journal = factory.journal();
        let mut manager = EngineResourceManager::new(factory);
        let mut leases: Vec<Vec<EngineLease<NullEngine>>> = vec![Vec::new(), Vec::new(), Vec::new()];

        for op in ops {
            match op {
                Op::Acquire(slot) => {
                    let lease = manager.acquire(&surface(slot)).expect("acquire");
                    leases[slot].push(lease);
                }
                Op::ReleaseViaManager(slot) => {
                    manager.release(&SurfaceId::new(format!("#surface-{slot}")));
                }
                Op::ReleaseViaLease(slot) => {
                    if let Some(lease) = leases[slot].last() {
                        lease.release();
                        prop_assert!(!lease.release());
                    }
                }
                Op::DropLease(slot) => {
                    leases[slot].pop();
                }
            }

            for slot_leases in &leases {
                let live = slot_leases.iter().filter(|lease| lease.is_live()).count();
                prop_assert!(live <= 1);
            }
            prop_assert!(manager.live_count() <= 3);
        }

        drop(leases);
        drop(manager);

        let starts = journal.count(|call| *call == EngineCall::Start);
        let releases = journal.count(|call| *call == EngineCall::Release);
        prop_assert_eq!(starts, releases);
    }
}
