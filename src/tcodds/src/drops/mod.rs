//! Treasure class evaluation
//!
//! [`Engine`] turns a treasure class into a [`Distribution`] of item classes,
//! [`CappedEngine`] corrects the few tables whose real drops are capped, and
//! [`Solver`] resolves the remaining quality rolls into per-tier odds.

mod capped;
mod engine;
mod solver;
mod types;

pub use capped::{CappedEngine, ALTERNATION_TABLES, ANCHOR_CLASS, SEVEN_PICK, SIX_SLOT_TABLES};
pub use engine::Engine;
pub use solver::Solver;
pub use types::{CacheKey, Distribution, DropVariant, ItemOdds, Outcome};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bonus::BonusVector;
    use crate::catalog::{Catalog, Target};
    use crate::quality::{quality_probability, Quality};
    use crate::settings::{Ruleset, Settings};
    use crate::test_support::{self, entry, ratio, CatalogBuilder};
    use crate::Error;
    use num_rational::BigRational;
    use num_traits::{One, Zero};
    use std::rc::Rc;

    /// Items 0, 1, 2 of a plain type; table 0 is
    /// `[item 0 (60) | item 1 (40)]` with no-drop weight 100
    fn basic_builder() -> CatalogBuilder {
        let mut b = test_support::quality_builder();
        let t = b.item_type(|t| t.can_be_rare = true);
        for _ in 0..3 {
            b.item(t, 0, |_| {});
        }
        b.table(|tc| {
            tc.expansion = 100;
            tc.classic = 100;
            tc.no_drop = 100;
            tc.entries = vec![entry(0, Target::Item(0)), entry(60, Target::Item(1))];
        });
        b
    }

    fn plain(quality: Quality) -> DropVariant {
        DropVariant {
            quality,
            bonus: BonusVector::default(),
        }
    }

    fn item_mass(d: &Distribution, class: usize) -> BigRational {
        d.item(class)
            .map(|variants| variants.values().fold(BigRational::zero(), |acc, p| acc + p))
            .unwrap_or_else(BigRational::zero)
    }

    fn engine(catalog: &Catalog) -> Engine<'_> {
        Engine::new(catalog, Settings::default())
    }

    #[test]
    fn test_disabled_tables_never_drop() {
        let mut b = basic_builder();
        let disabled = b.table(|tc| {
            tc.expansion = 0;
            tc.classic = 10;
            tc.entries = vec![entry(0, Target::Item(0))];
        });
        let empty = b.table(|tc| tc.expansion = 10);
        let catalog = b.build();
        let mut engine = engine(&catalog);

        let bonus = BonusVector {
            magic: 100,
            ..Default::default()
        };
        for tc in [disabled, empty] {
            for picks in [1, 3] {
                for bonus in [BonusVector::default(), bonus] {
                    let d = engine.get(tc, picks, bonus).unwrap();
                    assert_eq!(*d, Distribution::certain_no_drop());
                }
            }
        }
    }

    #[test]
    fn test_single_pick_selection() {
        let catalog = basic_builder().build();
        let mut engine = engine(&catalog);
        let d = engine.get(0, 1, BonusVector::default()).unwrap();

        assert_eq!(d.no_drop, ratio(1, 2));
        assert_eq!(d.item(0).unwrap()[&plain(Quality::Unresolved)], ratio(3, 10));
        assert_eq!(d.item(1).unwrap()[&plain(Quality::Unresolved)], ratio(1, 5));
        assert_eq!(d.max_count, 1);
        assert_eq!(d.total_mass(), BigRational::one());
    }

    #[test]
    fn test_nested_tables_fold_no_drop() {
        let mut b = basic_builder();
        b.catalog_mut().treasure_classes[0].bonus.magic = 5;
        let outer = b.table(|tc| {
            tc.expansion = 2;
            tc.entries = vec![
                entry(0, Target::TreasureClass(0)),
                entry(1, Target::Item(2)),
            ];
        });
        let catalog = b.build();
        let mut engine = engine(&catalog);
        let d = engine.get(outer, 1, BonusVector::default()).unwrap();

        assert_eq!(d.no_drop, ratio(1, 4));
        assert_eq!(item_mass(&d, 0), ratio(3, 20));
        assert_eq!(item_mass(&d, 1), ratio(1, 10));
        assert_eq!(item_mass(&d, 2), ratio(1, 2));
        assert_eq!(d.total_mass(), BigRational::one());

        // The inner table's thresholds follow its items
        let inner_bonus = BonusVector {
            magic: 5,
            ..Default::default()
        };
        let variants = d.item(0).unwrap();
        assert!(variants.keys().all(|v| v.bonus == inner_bonus));
        assert!(d.item(2).unwrap().contains_key(&plain(Quality::Unresolved)));
    }

    #[test]
    fn test_sub_table_bonus_is_elementwise_max() {
        let mut b = basic_builder();
        b.catalog_mut().treasure_classes[0].bonus.magic = 900;
        let outer = b.table(|tc| {
            tc.expansion = 1;
            tc.bonus.rare = 512;
            tc.entries = vec![entry(0, Target::TreasureClass(0))];
        });
        let catalog = b.build();
        let mut engine = engine(&catalog);
        let outer_bonus = catalog.treasure_classes[outer].bonus;
        let d = engine.get(outer, 1, outer_bonus).unwrap();

        let expected = BonusVector {
            magic: 900,
            rare: 512,
            ..Default::default()
        };
        let variants = d.item(0).unwrap();
        assert_eq!(variants.len(), 1);
        assert!(variants.keys().all(|v| v.bonus == expected));
    }

    #[test]
    fn test_sum_to_one_for_every_table() {
        let mut b = basic_builder();
        b.table(|tc| {
            tc.expansion = 7;
            tc.no_drop = 3;
            tc.entries = vec![
                entry(0, Target::TreasureClass(0)),
                entry(2, Target::Nothing),
                entry(3, Target::Item(2)),
                entry(6, Target::TreasureClass(0)),
            ];
        });
        b.table(|tc| {
            tc.expansion = 5;
            tc.entries = vec![entry(0, Target::TreasureClass(1)), entry(4, Target::Item(1))];
        });
        let catalog = b.build();
        let mut engine = engine(&catalog);

        for tc in 0..catalog.treasure_classes.len() {
            let d = engine.get(tc, 1, BonusVector::default()).unwrap();
            assert_eq!(d.total_mass(), BigRational::one(), "table {tc}");
        }
    }

    #[test]
    fn test_replacement_picks_scale() {
        let catalog = basic_builder().build();
        let mut engine = engine(&catalog);
        let d = engine.get(0, 3, BonusVector::default()).unwrap();

        assert_eq!(item_mass(&d, 0), ratio(9, 10));
        assert_eq!(item_mass(&d, 1), ratio(3, 5));
        assert_eq!(d.no_drop, ratio(1, 8));
        assert_eq!(d.max_count, 3);
    }

    #[test]
    fn test_depletion_picks_walk_the_table() {
        let mut b = basic_builder();
        let deplete = b.table(|tc| {
            tc.expansion = 3;
            tc.n_pick = -3;
            tc.entries = vec![
                entry(0, Target::Item(0)),
                entry(1, Target::Item(1)),
                entry(2, Target::Item(2)),
            ];
        });
        let short = b.table(|tc| {
            tc.expansion = 1;
            tc.n_pick = -2;
            tc.entries = vec![entry(0, Target::Item(0))];
        });
        let catalog = b.build();
        let mut engine = engine(&catalog);

        // The last pick lands on the last entry
        let last = engine.get(deplete, 1, BonusVector::default()).unwrap();
        assert_eq!(item_mass(&last, 2), BigRational::one());
        assert!(last.item(0).is_none());

        let all = engine.get(deplete, 3, BonusVector::default()).unwrap();
        for class in 0..3 {
            assert_eq!(item_mass(&all, class), BigRational::one());
        }
        assert!(all.no_drop.is_zero());
        assert_eq!(all.max_count, 3);

        // A window past the table total is a certain miss
        let miss = engine.get(short, 1, BonusVector::default()).unwrap();
        assert_eq!(miss.no_drop, BigRational::one());
        assert!(miss.items.is_empty());

        let both = engine.get(short, 2, BonusVector::default()).unwrap();
        assert_eq!(item_mass(&both, 0), BigRational::one());
        assert!(both.no_drop.is_zero());
        assert_eq!(both.max_count, 1);
    }

    #[test]
    fn test_cached_results_are_stable() {
        let mut b = basic_builder();
        b.table(|tc| {
            tc.expansion = 2;
            tc.entries = vec![entry(0, Target::TreasureClass(0))];
        });
        let catalog = b.build();
        let mut engine = engine(&catalog);

        let first = engine.get(1, 2, BonusVector::default()).unwrap();
        let inner = engine.get(0, 1, BonusVector::default()).unwrap();
        let cached = engine.cached();

        let again = engine.get(1, 2, BonusVector::default()).unwrap();
        assert!(Rc::ptr_eq(&first, &again));
        assert_eq!(engine.cached(), cached);

        let inner_again = engine.get(0, 1, BonusVector::default()).unwrap();
        assert_eq!(*inner, *inner_again);

        // A fresh engine reproduces the same values
        let mut fresh = Engine::new(&catalog, Settings::default());
        assert_eq!(*fresh.get(1, 2, BonusVector::default()).unwrap(), *first);
    }

    #[test]
    fn test_cycle_is_error() {
        let mut b = basic_builder();
        b.table(|tc| {
            tc.expansion = 1;
            tc.entries = vec![entry(0, Target::TreasureClass(2))];
        });
        b.table(|tc| {
            tc.expansion = 1;
            tc.entries = vec![entry(0, Target::TreasureClass(1))];
        });
        let catalog = b.build();
        let mut engine = engine(&catalog);

        for _ in 0..2 {
            assert!(matches!(
                engine.get(1, 1, BonusVector::default()),
                Err(Error::CyclicTreasureClass(1))
            ));
        }
    }

    #[test]
    fn test_tc30_on_item_table_is_unsupported() {
        let mut b = basic_builder();
        b.catalog_mut().treasure_classes[0].bonus.tc30 = 1;
        let catalog = b.build();
        let mut engine = engine(&catalog);

        assert!(matches!(
            engine.get(0, 1, BonusVector::default()),
            Err(Error::UnsupportedTableFeature {
                index: 0,
                feature: "TC30"
            })
        ));
    }

    #[test]
    fn test_tc32_on_item_table_is_unsupported() {
        let mut b = basic_builder();
        b.catalog_mut().treasure_classes[0].bonus.tc32 = 1;
        let catalog = b.build();
        let mut engine = engine(&catalog);

        assert!(matches!(
            engine.get(0, 1, BonusVector::default()),
            Err(Error::UnsupportedTableFeature {
                index: 0,
                feature: "TC32"
            })
        ));
    }

    #[test]
    fn test_tc30_tc32_on_sub_table_only_table_evaluates() {
        let mut b = basic_builder();
        let outer = b.table(|tc| {
            tc.expansion = 1;
            tc.bonus.tc30 = 1;
            tc.bonus.tc32 = 1;
            tc.entries = vec![entry(0, Target::TreasureClass(0))];
        });
        let catalog = b.build();
        let mut engine = engine(&catalog);

        let d = engine.get(outer, 1, BonusVector::default()).unwrap();
        assert_eq!(d.no_drop, ratio(1, 2));
        assert_eq!(item_mass(&d, 0), ratio(3, 10));
        assert_eq!(d.total_mass(), BigRational::one());
    }

    #[test]
    fn test_out_of_range_references() {
        let mut b = basic_builder();
        b.table(|tc| {
            tc.expansion = 1;
            tc.entries = vec![entry(0, Target::Item(99))];
        });
        let catalog = b.build();
        let mut engine = engine(&catalog);

        assert!(matches!(
            engine.get(1, 1, BonusVector::default()),
            Err(Error::OutOfRange { index: 99, .. })
        ));
        assert!(matches!(
            engine.get(50, 1, BonusVector::default()),
            Err(Error::OutOfRange { index: 50, .. })
        ));
    }

    #[test]
    fn test_nothing_entry_is_no_drop() {
        let mut b = basic_builder();
        let tc = b.table(|tc| {
            tc.expansion = 4;
            tc.entries = vec![entry(0, Target::Nothing), entry(3, Target::Item(0))];
        });
        let catalog = b.build();
        let d = engine(&catalog).get(tc, 1, BonusVector::default()).unwrap();

        assert_eq!(d.no_drop, ratio(3, 4));
        assert_eq!(item_mass(&d, 0), ratio(1, 4));
    }

    #[test]
    fn test_forced_quality_entries() {
        let mut b = basic_builder();
        let tc = b.table(|tc| {
            tc.expansion = 2;
            tc.entries = vec![
                crate::Entry {
                    force_unique: true,
                    ..entry(0, Target::Item(0))
                },
                crate::Entry {
                    force_set: true,
                    ..entry(1, Target::Item(0))
                },
            ];
        });
        let catalog = b.build();
        let d = engine(&catalog).get(tc, 1, BonusVector::default()).unwrap();

        let variants = d.item(0).unwrap();
        assert_eq!(variants[&plain(Quality::Unique)], ratio(1, 2));
        assert_eq!(variants[&plain(Quality::Set)], ratio(1, 2));
    }

    fn classic_builder() -> (CatalogBuilder, usize) {
        let mut b = basic_builder();
        let throwable = b.item_type(|t| t.throwable = true);
        let javelin = b.item(throwable, 0, |_| {});
        (b, javelin)
    }

    fn classic() -> Settings {
        Settings {
            ruleset: Ruleset::Classic,
            ..Settings::default()
        }
    }

    #[test]
    fn test_classic_throwables_renormalize() {
        let (mut b, javelin) = classic_builder();
        let tc = b.table(|tc| {
            tc.classic = 4;
            tc.expansion = 4;
            tc.entries = vec![
                entry(0, Target::Item(javelin)),
                entry(1, Target::Item(0)),
                entry(2, Target::Item(1)),
            ];
        });
        let only = b.table(|tc| {
            tc.classic = 4;
            tc.entries = vec![entry(0, Target::Item(javelin))];
        });
        let catalog = b.build();

        let mut classic = Engine::new(&catalog, classic());
        let d = classic.get(tc, 1, BonusVector::default()).unwrap();
        assert!(d.item(javelin).is_none());
        assert_eq!(item_mass(&d, 0), ratio(1, 3));
        assert_eq!(item_mass(&d, 1), ratio(2, 3));
        assert_eq!(d.total_mass(), BigRational::one());

        let d = classic.get(only, 1, BonusVector::default()).unwrap();
        assert_eq!(*d, Distribution::certain_no_drop());

        let mut expansion = engine(&catalog);
        let d = expansion.get(tc, 1, BonusVector::default()).unwrap();
        assert_eq!(item_mass(&d, javelin), ratio(1, 4));
    }

    #[test]
    fn test_classic_ranges_and_level_limit() {
        let (mut b, _) = classic_builder();
        let t = b.catalog_mut().items[0].item_type;
        let expansion_only = b.item(t, 0, |i| i.level_req = 100);
        let tc = b.table(|tc| {
            tc.classic = 4;
            tc.expansion = 4;
            tc.entries = vec![
                crate::Entry {
                    bonus: BonusVector {
                        magic: 7,
                        ..Default::default()
                    },
                    ..entry(0, Target::Item(0))
                },
                crate::Entry {
                    continues_previous: true,
                    ..entry(2, Target::Item(expansion_only))
                },
                entry(3, Target::Item(1)),
            ];
        });
        let catalog = b.build();

        let d = Engine::new(&catalog, classic())
            .get(tc, 1, BonusVector::default())
            .unwrap();
        assert_eq!(item_mass(&d, 0), ratio(3, 4));
        assert_eq!(item_mass(&d, 1), ratio(1, 4));
        assert!(d.item(expansion_only).is_none());
        assert!(d.item(0).unwrap().keys().all(|v| v.bonus.magic == 7));

        let d = engine(&catalog).get(tc, 1, BonusVector::default()).unwrap();
        assert_eq!(item_mass(&d, 0), ratio(1, 2));
        assert_eq!(item_mass(&d, expansion_only), ratio(1, 4));
        assert_eq!(item_mass(&d, 1), ratio(1, 4));
        assert!(d.item(0).unwrap().keys().all(|v| v.bonus.magic == 0));
    }

    #[test]
    fn test_classic_level_limit_folds_into_no_drop() {
        let (mut b, _) = classic_builder();
        let t = b.catalog_mut().items[0].item_type;
        let expansion_only = b.item(t, 0, |i| i.level_req = 100);
        let tc = b.table(|tc| {
            tc.classic = 2;
            tc.entries = vec![
                entry(0, Target::Item(expansion_only)),
                entry(1, Target::Item(0)),
            ];
        });
        let catalog = b.build();

        let d = Engine::new(&catalog, classic())
            .get(tc, 1, BonusVector::default())
            .unwrap();
        assert_eq!(d.no_drop, ratio(1, 2));
        assert_eq!(item_mass(&d, 0), ratio(1, 2));
    }

    #[test]
    fn test_players_and_item_find() {
        let catalog = basic_builder().build();

        let players = Settings {
            players: 2,
            ..Settings::default()
        };
        let d = Engine::new(&catalog, players)
            .get(0, 1, BonusVector::default())
            .unwrap();
        // The no-drop weight 100 becomes 100 / (2^2 - 1) = 33
        assert_eq!(d.no_drop, ratio(33, 133));
        assert_eq!(item_mass(&d, 0), ratio(60, 133));
        assert_eq!(d.total_mass(), BigRational::one());

        let find = Settings {
            item_find: true,
            ..Settings::default()
        };
        let d = Engine::new(&catalog, find)
            .get(0, 1, BonusVector::default())
            .unwrap();
        assert!(d.no_drop.is_zero());
        assert_eq!(item_mass(&d, 0), ratio(3, 5));
        assert_eq!(item_mass(&d, 1), ratio(2, 5));
    }

    fn solver_catalog() -> Catalog {
        let mut b = basic_builder();
        b.table(|tc| {
            tc.expansion = 2;
            tc.no_drop = 2;
            tc.bonus.unique = 400;
            tc.entries = vec![
                entry(0, Target::Item(2)),
                crate::Entry {
                    force_unique: true,
                    ..entry(1, Target::Item(2))
                },
            ];
        });
        b.build()
    }

    fn level_ten() -> Settings {
        Settings {
            monster_level: 10,
            ..Settings::default()
        }
    }

    #[test]
    fn test_solve_resolves_quality() {
        let catalog = solver_catalog();
        let mut solver = Solver::new(&catalog, level_ten());
        let v = solver.solve(1, 2).unwrap();

        let table_bonus = catalog.treasure_classes[1].bonus;
        let rolled = quality_probability(&catalog, 2, 10, 0, &table_bonus).unwrap();
        let quarter = ratio(1, 4);
        for quality in crate::QUALITY_TIERS {
            let mut expected = &rolled[quality.index()] * &quarter;
            if quality == Quality::Unique {
                expected += &quarter;
            }
            assert_eq!(v[quality.index()], expected, "{quality}");
        }

        let total = v.iter().fold(BigRational::zero(), |acc, p| acc + p);
        assert_eq!(total, ratio(1, 2));
    }

    #[test]
    fn test_single_pick_solve_matches_engine() {
        let catalog = basic_builder().build();
        let mut solver = Solver::new(&catalog, level_ten());
        let v = solver.solve(0, 0).unwrap();

        let rolled = quality_probability(&catalog, 0, 10, 0, &BonusVector::default()).unwrap();
        for (got, q) in v.iter().zip(rolled.iter()) {
            assert_eq!(*got, q * ratio(3, 10));
        }
    }

    #[test]
    fn test_solve_absent_and_invalid_classes() {
        let catalog = solver_catalog();
        let mut solver = Solver::new(&catalog, level_ten());

        assert!(solver.solve(1, 0).unwrap().iter().all(|p| p.is_zero()));
        assert!(matches!(
            solver.solve(1, 99),
            Err(Error::OutOfRange { index: 99, .. })
        ));
        assert!(matches!(
            solver.solve(9, 0),
            Err(Error::OutOfRange { index: 9, .. })
        ));
    }

    #[test]
    fn test_solve_all_lists_dropping_classes() {
        let catalog = basic_builder().build();
        let mut solver = Solver::new(&catalog, level_ten());
        let odds = solver.solve_all(0).unwrap();

        assert_eq!(odds.len(), 2);
        assert_eq!(odds[0].class, 0);
        assert_eq!(odds[0].code, "i00");
        assert_eq!(odds[0].total, ratio(3, 10));
        assert_eq!(odds[1].class, 1);
        assert_eq!(odds[1].total, ratio(1, 5));
        assert!(odds[0].nonzero_tiers().all(|(q, _)| q != Quality::Unresolved));

        let again = solver.solve_all(0).unwrap();
        assert_eq!(odds, again);
    }
}
