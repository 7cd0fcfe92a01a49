//! Validate a small folder tree and print the failure table.
//!
//! ```text
//! ARBOR_LOG=arbor_validator=debug cargo run -p arbor-validator --example folder_report
//! ```

use arbor_core::{Attribute, Kind, Node, NodeRef, Shared, Value, define_kind, share};
use arbor_validator::{Failure, Options, Params, Registry, ensure, register};

define_kind!(FOLDER = "Folder");
define_kind!(GROUP = "Group");

struct Group {
    name: &'static str,
    members: Vec<String>,
}

impl Node for Group {
    fn kind(&self) -> Kind {
        GROUP
    }
    fn attributes(&self) -> Vec<Attribute> {
        vec![Attribute::scalar("name"), Attribute::scalar("members")]
    }
    fn label(&self) -> String {
        format!("Group({})", self.name)
    }
}

struct Folder {
    groups: Vec<Shared<Group>>,
}

impl Node for Folder {
    fn kind(&self) -> Kind {
        FOLDER
    }
    fn attributes(&self) -> Vec<Attribute> {
        vec![Attribute::new("groups", Value::seq(&self.groups))]
    }
}

fn has_min_members(group: &Group, params: &Params) -> Result<(), Failure> {
    let min_count: usize = params.get("min_count")?;
    ensure!(
        group.members.len() >= min_count,
        "{} members, expected at least {min_count}",
        group.members.len()
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _guard = arbor_log::auto_init()?;

    let registry = Registry::new();
    register!(registry, "folders", GROUP, has_min_members as Group, min_count = 1)?;

    let root: NodeRef = share(Folder {
        groups: vec![
            share(Group {
                name: "admins",
                members: vec!["ada".into(), "grace".into()],
            }),
            share(Group {
                name: "guests",
                members: Vec::new(),
            }),
        ],
    });

    let report = registry.report(&root, "folders", &Options::new().with("min_count", 2))?;
    println!("{report}");
    Ok(())
}
