use clap::ValueEnum;
use comfy_table::{ContentArrangement, Table};
use nf_core::{Background, HavenUpgrade, Location, Race, VampireClass};

/// The static tables that can be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ContentTable {
    Races,
    Classes,
    Backgrounds,
    Locations,
    Upgrades,
}

impl ContentTable {
    const ALL: [ContentTable; 5] = [
        Self::Races,
        Self::Classes,
        Self::Backgrounds,
        Self::Locations,
        Self::Upgrades,
    ];

    fn title(self) -> &'static str {
        match self {
            Self::Races => "Races",
            Self::Classes => "Classes",
            Self::Backgrounds => "Backgrounds",
            Self::Locations => "Locations",
            Self::Upgrades => "Haven Upgrades",
        }
    }
}

pub fn run(table: Option<ContentTable>) -> Result<(), String> {
    let tables = match table {
        Some(t) => vec![t],
        None => ContentTable::ALL.to_vec(),
    };

    for t in tables {
        println!("  {}", t.title());
        println!("{}", render(t));
        println!();
    }
    Ok(())
}

fn render(kind: ContentTable) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    match kind {
        ContentTable::Races => {
            table.set_header(vec!["Name", "Description"]);
            for r in Race::ALL {
                table.add_row(vec![r.name(), r.description()]);
            }
        }
        ContentTable::Classes => {
            table.set_header(vec!["Name", "Discipline", "Description"]);
            for c in VampireClass::ALL {
                table.add_row(vec![c.name(), c.discipline().name(), c.description()]);
            }
        }
        ContentTable::Backgrounds => {
            table.set_header(vec!["Name", "Bonus", "Description"]);
            for b in Background::ALL {
                table.add_row(vec![b.name(), b.bonus(), b.description()]);
            }
        }
        ContentTable::Locations => {
            table.set_header(vec!["Name", "Description"]);
            for l in Location::ALL {
                table.add_row(vec![l.name(), l.description()]);
            }
        }
        ContentTable::Upgrades => {
            table.set_header(vec!["Name", "Influence", "Description"]);
            for u in HavenUpgrade::ALL {
                table.add_row(vec![
                    u.name().to_string(),
                    u.influence_cost().to_string(),
                    u.description().to_string(),
                ]);
            }
        }
    }
    table
}
