//! Record fixtures.

use std::collections::BTreeMap;

use gmtable_core::identity::Id;
use gmtable_core::record::{Act, GmcInstance, Record, RecordTag, Scenario, Scene, Scope};

/// A scenario with a fixed title.
#[must_use]
pub fn scenario(id: Id) -> Record {
    Record::Scenario(Scenario {
        id,
        title: format!("Scenario {id}"),
        game: "Trail of Cthulhu".to_owned(),
    })
}

/// An act belonging to scenario 1.
#[must_use]
pub fn act(id: Id) -> Record {
    Record::Act(Act {
        id,
        title: format!("Act {id}"),
        scenario: 1,
        order_key: 0,
    })
}

/// A scene scoped to scenario 1.
#[must_use]
pub fn scene(id: Id) -> Record {
    Record::Scene(Scene {
        id,
        title: format!("Scene {id}"),
        scope: Scope {
            tag: RecordTag::Scenario,
            id: 1,
        },
    })
}

/// A character instance whose first pool holds `health`.
#[must_use]
pub fn gmc(id: Id, health: i64) -> Record {
    Record::Gmc(GmcInstance {
        id,
        prototype: 1,
        instance_counter: 0,
        pool_values: BTreeMap::from([(1, health)]),
    })
}
