use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::collection::{Collection, CollectionNode};
use crate::slug::slugify_or;
use crate::synth::synthesize;
use crate::writer::{Plan, PlanEntry};

/// Lays out `<output>/<collection slug>/` for the whole collection, without
/// touching the filesystem.
pub fn plan_collection(collection: &Collection, output: &Path) -> Plan {
    let base = output.join(slugify_or(&collection.info.name, "collection"));
    let mut plan = Plan {
        base: base.clone(),
        entries: vec![PlanEntry::Package(base.clone())],
    };
    let mut seen = HashSet::new();
    walk(&collection.item, &base, &mut plan, &mut seen);
    plan
}

fn walk(items: &[CollectionNode], dir: &Path, plan: &mut Plan, seen: &mut HashSet<PathBuf>) {
    for node in items {
        match node {
            CollectionNode::Request(request) => {
                let function = synthesize(request);
                let path = dir.join(function.file_name());
                if !seen.insert(path.clone()) {
                    log::warn!(
                        "{} overwrites an earlier request with the same name",
                        path.display()
                    );
                }
                plan.entries.push(PlanEntry::Module {
                    path,
                    contents: function.render(),
                });
            }
            CollectionNode::Folder(folder) => {
                let sub = dir.join(slugify_or(&folder.name, "folder"));
                plan.entries.push(PlanEntry::Package(sub.clone()));
                walk(&folder.items, &sub, plan, seen);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::parse_collection;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    const COLLECTION: &str = indoc! {r#"
        {
          "info": { "name": "My Shop API" },
          "item": [
            { "name": "Zeta", "request": { "method": "GET", "url": { "raw": "https://x/z" } } },
            {
              "name": "Orders & Carts",
              "item": [
                { "name": "List Orders", "request": { "method": "GET", "url": { "raw": "https://x/orders" } } },
                { "name": "Nested", "item": [
                  { "name": "Deep", "request": { "method": "GET", "url": { "raw": "https://x/deep" } } }
                ] }
              ]
            },
            { "name": "Alpha", "request": { "method": "GET", "url": { "raw": "https://x/a" } } }
          ]
        }
    "#};

    fn describe(plan: &Plan) -> Vec<String> {
        plan.entries
            .iter()
            .map(|entry| match entry {
                PlanEntry::Package(dir) => format!("pkg {}", dir.display()),
                PlanEntry::Module { path, .. } => format!("mod {}", path.display()),
            })
            .collect()
    }

    #[test]
    fn mirrors_folders_in_source_order() {
        let collection = parse_collection(COLLECTION).unwrap();
        let plan = plan_collection(&collection, Path::new("out"));

        assert_eq!(plan.base, PathBuf::from("out/my_shop_api"));
        assert_eq!(
            describe(&plan),
            vec![
                "pkg out/my_shop_api",
                "mod out/my_shop_api/zeta.py",
                "pkg out/my_shop_api/orders__carts",
                "mod out/my_shop_api/orders__carts/list_orders.py",
                "pkg out/my_shop_api/orders__carts/nested",
                "mod out/my_shop_api/orders__carts/nested/deep.py",
                "mod out/my_shop_api/alpha.py",
            ]
        );
    }

    #[test]
    fn colliding_names_are_both_planned_in_order() {
        let json = indoc! {r#"
            { "info": { "name": "c" }, "item": [
              { "name": "Get User", "request": { "method": "GET", "url": "https://x/1" } },
              { "name": "get user?", "request": { "method": "POST", "url": "https://x/2" } }
            ] }
        "#};
        let plan = plan_collection(&parse_collection(json).unwrap(), Path::new("out"));
        let modules: Vec<&PlanEntry> = plan
            .entries
            .iter()
            .filter(|e| matches!(e, PlanEntry::Module { .. }))
            .collect();
        assert_eq!(modules.len(), 2);
        let PlanEntry::Module { path, contents } = modules[1] else {
            panic!("expected module");
        };
        assert_eq!(path, &PathBuf::from("out/c/get_user.py"));
        assert!(contents.contains("requests.post"));
    }

    #[test]
    fn empty_collection_name_uses_fallback() {
        let collection = parse_collection(r#"{ "info": { "name": "***" }, "item": [] }"#).unwrap();
        let plan = plan_collection(&collection, Path::new("gen"));
        assert_eq!(plan.base, PathBuf::from("gen/collection"));
        assert_eq!(plan.entries.len(), 1);
    }
}
