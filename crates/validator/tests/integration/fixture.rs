//! Shared record graphs for the integration tests.
//!
//! Two families:
//!
//! - an event catalog (`Catalog -> Event -> Origin -> Arrival`, `Event ->
//!   Pick`), with a weak back-reference from each event to its catalog and
//!   arrivals pointing at picks by id only;
//! - a `Folder -> Group -> Leaf` tree for child-count checks.

#![allow(dead_code)]

use std::sync::{Arc, Weak};

use arbor_core::{Attribute, Kind, Node, NodeRef, Shared, Value, define_kind, share};
use arbor_validator::{Failure, Params, ensure, fail};
use parking_lot::RwLock;

// ============================================================================
// EVENT CATALOG
// ============================================================================

define_kind!(pub RECORD = "Record");
define_kind!(pub IDENTIFIED = "Identified": RECORD);
define_kind!(pub CATALOG = "Catalog": IDENTIFIED);
define_kind!(pub EVENT = "Event": IDENTIFIED);
define_kind!(pub ORIGIN = "Origin": IDENTIFIED);
define_kind!(pub PICK = "Pick": IDENTIFIED);
define_kind!(pub ARRIVAL = "Arrival": RECORD);
define_kind!(pub COMMENT = "Comment": RECORD);

fn id_value(id: Option<&String>) -> Value {
    if id.is_some() { Value::Scalar } else { Value::Null }
}

pub struct Comment {
    pub text: String,
}

impl Node for Comment {
    fn kind(&self) -> Kind {
        COMMENT
    }
    fn attributes(&self) -> Vec<Attribute> {
        vec![Attribute::scalar("text")]
    }
}

pub struct Catalog {
    pub resource_id: Option<String>,
    pub events: Vec<Shared<Event>>,
    pub comments: Vec<Shared<Comment>>,
}

impl Node for Catalog {
    fn kind(&self) -> Kind {
        CATALOG
    }
    fn attributes(&self) -> Vec<Attribute> {
        vec![
            Attribute::new("resource_id", id_value(self.resource_id.as_ref())),
            Attribute::new("events", Value::seq(&self.events)),
            Attribute::new("comments", Value::seq(&self.comments)),
        ]
    }
    fn label(&self) -> String {
        format!("Catalog({})", self.resource_id.as_deref().unwrap_or("?"))
    }
}

pub struct Event {
    pub resource_id: Option<String>,
    pub catalog: Weak<RwLock<Catalog>>,
    pub preferred_origin_id: Option<String>,
    pub origins: Vec<Shared<Origin>>,
    pub picks: Vec<Shared<Pick>>,
    pub comments: Vec<Shared<Comment>>,
}

impl Node for Event {
    fn kind(&self) -> Kind {
        EVENT
    }
    fn attributes(&self) -> Vec<Attribute> {
        vec![
            Attribute::new("resource_id", id_value(self.resource_id.as_ref())),
            Attribute::new("catalog", Value::weak(&self.catalog)),
            Attribute::new("preferred_origin_id", id_value(self.preferred_origin_id.as_ref())),
            Attribute::new("origins", Value::seq(&self.origins)),
            Attribute::new("picks", Value::seq(&self.picks)),
            Attribute::new("comments", Value::seq(&self.comments)),
        ]
    }
    fn label(&self) -> String {
        format!("Event({})", self.resource_id.as_deref().unwrap_or("?"))
    }
}

pub struct Origin {
    pub resource_id: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub depth: Option<f64>,
    pub arrivals: Vec<Shared<Arrival>>,
}

impl Node for Origin {
    fn kind(&self) -> Kind {
        ORIGIN
    }
    fn attributes(&self) -> Vec<Attribute> {
        vec![
            Attribute::new("resource_id", id_value(self.resource_id.as_ref())),
            Attribute::scalar("latitude"),
            Attribute::scalar("longitude"),
            Attribute::new(
                "depth",
                if self.depth.is_some() { Value::Scalar } else { Value::Null },
            ),
            Attribute::new("arrivals", Value::seq(&self.arrivals)),
        ]
    }
    fn label(&self) -> String {
        format!("Origin({})", self.resource_id.as_deref().unwrap_or("?"))
    }
}

pub struct Pick {
    pub resource_id: Option<String>,
    pub phase_hint: String,
    pub time: f64,
}

impl Node for Pick {
    fn kind(&self) -> Kind {
        PICK
    }
    fn attributes(&self) -> Vec<Attribute> {
        vec![
            Attribute::new("resource_id", id_value(self.resource_id.as_ref())),
            Attribute::scalar("phase_hint"),
            Attribute::scalar("time"),
        ]
    }
    fn label(&self) -> String {
        format!("Pick({})", self.resource_id.as_deref().unwrap_or("?"))
    }
}

pub struct Arrival {
    pub pick_id: String,
    pub phase: String,
}

impl Node for Arrival {
    fn kind(&self) -> Kind {
        ARRIVAL
    }
    fn attributes(&self) -> Vec<Attribute> {
        vec![Attribute::scalar("pick_id"), Attribute::scalar("phase")]
    }
    fn label(&self) -> String {
        format!("Arrival({})", self.pick_id)
    }
}

fn pick(id: &str, phase: &str, time: f64) -> Shared<Pick> {
    share(Pick {
        resource_id: Some(id.to_owned()),
        phase_hint: phase.to_owned(),
        time,
    })
}

fn arrival(pick_id: &str, phase: &str) -> Shared<Arrival> {
    share(Arrival {
        pick_id: pick_id.to_owned(),
        phase: phase.to_owned(),
    })
}

fn event(
    catalog: &Shared<Catalog>,
    id: &str,
    latitude: f64,
    picks: Vec<Shared<Pick>>,
) -> Shared<Event> {
    let origin_id = format!("{id}/origin");
    let arrivals = picks
        .iter()
        .map(|p| {
            let p = p.read();
            arrival(p.resource_id.as_deref().unwrap_or_default(), &p.phase_hint)
        })
        .collect();
    share(Event {
        resource_id: Some(id.to_owned()),
        catalog: Arc::downgrade(catalog),
        preferred_origin_id: Some(origin_id.clone()),
        origins: vec![share(Origin {
            resource_id: Some(origin_id),
            latitude,
            longitude: -111.0,
            depth: Some(8_000.0),
            arrivals,
        })],
        picks,
        comments: vec![share(Comment {
            text: format!("located {id}"),
        })],
    })
}

/// A consistent two-event catalog.
///
/// ```text
/// Catalog(cat)
/// ├── events[0] Event(ev1): origin ev1/origin (lat 40.5), picks p1 (P), p2 (S)
/// └── events[1] Event(ev2): origin ev2/origin (lat 41.2), pick  p3 (P)
/// ```
pub fn catalog() -> Shared<Catalog> {
    let catalog = share(Catalog {
        resource_id: Some("cat".to_owned()),
        events: Vec::new(),
        comments: Vec::new(),
    });
    let first = event(
        &catalog,
        "ev1",
        40.5,
        vec![pick("p1", "P", 10.0), pick("p2", "S", 12.5)],
    );
    let second = event(&catalog, "ev2", 41.2, vec![pick("p3", "P", 30.0)]);
    catalog.write().events = vec![first, second];
    catalog
}

/// The catalog as a node handle.
pub fn catalog_node(catalog: &Shared<Catalog>) -> NodeRef {
    catalog.clone()
}

pub fn event_at(catalog: &Shared<Catalog>, index: usize) -> Shared<Event> {
    catalog.read().events[index].clone()
}

/// Number of `Identified` nodes in [`catalog`]: the catalog, two events,
/// two origins and three picks.
pub const IDENTIFIED_NODES: usize = 8;

/// Number of nodes of any kind in [`catalog`].
pub const ALL_NODES: usize = IDENTIFIED_NODES + 3 + 2;

// ----------------------------------------------------------------------------
// Catalog validators
// ----------------------------------------------------------------------------

pub fn has_resource_id(node: &NodeRef, _: &Params) -> Result<(), Failure> {
    let record = node.read();
    ensure!(
        record.has_attribute("resource_id"),
        "{} has no resource_id",
        record.kind()
    );
    Ok(())
}

pub fn arrivals_reference_picks(event: &Event, _: &Params) -> Result<(), Failure> {
    let pick_ids: Vec<String> = event
        .picks
        .iter()
        .filter_map(|p| p.read().resource_id.clone())
        .collect();
    for origin in &event.origins {
        for arrival in &origin.read().arrivals {
            let arrival = arrival.read();
            if !pick_ids.contains(&arrival.pick_id) {
                fail!("arrival references unknown pick `{}`", arrival.pick_id);
            }
        }
    }
    Ok(())
}

pub fn has_preferred_origin(event: &Event, _: &Params) -> Result<(), Failure> {
    let Some(preferred) = event.preferred_origin_id.as_deref() else {
        return Err(Failure::fault("event has no preferred_origin_id to check"));
    };
    let found = event
        .origins
        .iter()
        .any(|o| o.read().resource_id.as_deref() == Some(preferred));
    ensure!(found, "preferred origin `{preferred}` is not among the origins");
    Ok(())
}

pub fn origin_in_bounds(origin: &Origin, params: &Params) -> Result<(), Failure> {
    let min_lat: f64 = params.get("min_lat")?;
    let max_lat: f64 = params.get("max_lat")?;
    ensure!(
        (min_lat..=max_lat).contains(&origin.latitude),
        "latitude {} outside [{min_lat}, {max_lat}]",
        origin.latitude
    );
    Ok(())
}

pub fn fill_missing_resource_id(pick: &mut Pick, _: &Params) -> Result<(), Failure> {
    if pick.resource_id.is_none() {
        pick.resource_id = Some(format!("generated/{}", pick.time));
    }
    Ok(())
}

// ============================================================================
// FOLDER / GROUP / LEAF
// ============================================================================

define_kind!(pub FOLDER = "Folder");
define_kind!(pub GROUP = "Group");
define_kind!(pub LEAF = "Leaf");

pub struct Leaf {
    pub name: &'static str,
}

impl Node for Leaf {
    fn kind(&self) -> Kind {
        LEAF
    }
    fn attributes(&self) -> Vec<Attribute> {
        vec![Attribute::scalar("name")]
    }
    fn label(&self) -> String {
        format!("Leaf({})", self.name)
    }
}

pub struct Group {
    pub name: &'static str,
    pub children: Vec<Shared<Leaf>>,
}

impl Node for Group {
    fn kind(&self) -> Kind {
        GROUP
    }
    fn attributes(&self) -> Vec<Attribute> {
        vec![
            Attribute::scalar("name"),
            Attribute::new("children", Value::seq(&self.children)),
        ]
    }
    fn label(&self) -> String {
        format!("Group({})", self.name)
    }
}

/// A folder whose groups are reachable twice: through `groups` and through
/// the `index` map.
pub struct Folder {
    pub groups: Vec<Shared<Group>>,
    pub index: Vec<(String, Shared<Group>)>,
}

impl Node for Folder {
    fn kind(&self) -> Kind {
        FOLDER
    }
    fn attributes(&self) -> Vec<Attribute> {
        vec![
            Attribute::new("groups", Value::seq(&self.groups)),
            Attribute::new(
                "index",
                Value::map(self.index.iter().map(|(key, group)| (key, group))),
            ),
        ]
    }
}

/// `full` holds two leaves, `empty` holds none.
pub fn folder() -> Shared<Folder> {
    let full = share(Group {
        name: "full",
        children: vec![share(Leaf { name: "a" }), share(Leaf { name: "b" })],
    });
    let empty = share(Group {
        name: "empty",
        children: Vec::new(),
    });
    share(Folder {
        index: vec![
            ("empty".to_owned(), empty.clone()),
            ("full".to_owned(), full.clone()),
        ],
        groups: vec![full, empty],
    })
}

pub fn has_min_children(group: &Group, params: &Params) -> Result<(), Failure> {
    let min_count: usize = params.get("min_count")?;
    ensure!(
        group.children.len() >= min_count,
        "{} has {} children, expected at least {min_count}",
        group.name,
        group.children.len()
    );
    Ok(())
}
