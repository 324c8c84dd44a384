// Copyright (c) 2017 King's College London
// created by the Software Development Team <http://soft-dev.org/>
//
// The Universal Permissive License (UPL), Version 1.0
//
// Subject to the condition set forth below, permission is hereby granted to any person obtaining a
// copy of this software, associated documentation and/or data (collectively the "Software"), free
// of charge and under any and all copyright rights in the Software, and any and all patent rights
// owned or freely licensable by each licensor hereunder covering either (i) the unmodified
// Software as contributed to or provided by such licensor, or (ii) the Larger Works (as defined
// below), to deal in both
//
// (a) the Software, and
// (b) any piece of software and/or hardware listed in the lrgrwrks.txt file
// if one is included with the Software (each a "Larger Work" to which the Software is contributed
// by such licensors),
//
// without restriction, including without limitation the rights to copy, create derivative works
// of, display, perform, and distribute the Software and make, use, sell, offer for sale, import,
// export, have made, and have sold the Software and the Larger Work(s), and to sublicense the
// foregoing rights on either these or other terms.
//
// This license is subject to the following condition: The above copyright notice and either this
// complete permission notice or at a minimum a reference to the UPL must be included in all copies
// or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
// BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use glr_grammar::{ParseAction, ParseTable, Symbol};
use glr_stack::{Gss, VersionId};
use glr_tree::SubtreePool;

use crate::reduce::reduce;

/// Spec §4.10: for every token the grammar could conceivably reduce on
/// from `version`'s current state — restricted to `lookahead_symbol`
/// alone when given one, otherwise every token symbol the table knows
/// about — run every such reduce (as a fragile, speculative one, mirroring
/// `original_source/lib/src/parser.c`'s `true, false` reduce-call
/// arguments) and report whether a genuine (non-extra, non-repetition)
/// shift action exists anywhere in that symbol range.
///
/// `original_source`'s version chains every matching reduce through a
/// freshly-spawned stack version and renumbers the last one back onto
/// `version`, because its GSS's `pop_count` can fan a version out into
/// several paths. Under this workspace's one-path-per-version `Gss`,
/// `reduce` never spawns a new version (see its own doc comment), so that
/// renumbering dance collapses to simply calling `reduce` on `version`
/// itself once per distinct reduce action.
pub fn do_all_potential_reductions(
    gss: &mut Gss,
    pool: &SubtreePool,
    table: &dyn ParseTable,
    version: VersionId,
    lookahead_symbol: Option<Symbol>,
) -> bool {
    let state = gss.state(version);
    let mut has_shift_action = false;
    let mut reduce_actions: Vec<(Symbol, u32, i32, glr_grammar::ProductionId)> = Vec::new();

    let (first, end) = match lookahead_symbol {
        Some(sym) => (sym.as_u32(), sym.as_u32() + 1),
        None => (1, table.token_count()),
    };

    for raw in first..end {
        let symbol = Symbol::new(raw);
        for action in table.actions(state, symbol) {
            match action {
                ParseAction::Shift { extra, repetition, .. } => {
                    if !extra && !repetition {
                        has_shift_action = true;
                    }
                }
                ParseAction::Reduce {
                    symbol: reduced_symbol,
                    child_count,
                    dynamic_precedence,
                    production_id,
                } if *child_count > 0 => {
                    let entry = (*reduced_symbol, *child_count, *dynamic_precedence, *production_id);
                    if !reduce_actions.contains(&entry) {
                        reduce_actions.push(entry);
                    }
                }
                _ => {}
            }
        }
    }

    for (symbol, count, dynamic_precedence, production_id) in reduce_actions {
        reduce(
            gss,
            pool,
            table,
            version,
            symbol,
            count as usize,
            dynamic_precedence,
            production_id,
            true,
            false,
            usize::MAX,
            usize::MAX,
        );
    }

    has_shift_action
}

#[cfg(test)]
mod test {
    use super::*;
    use glr_grammar::toy::ToyTable;
    use glr_grammar::{ProductionId, StateId};
    use glr_lex::Point;

    #[test]
    fn reports_a_shift_action_without_disturbing_the_stack() {
        let mut table = ToyTable::new(8, Symbol::new(0), Symbol::new(1), Symbol::new(2));
        table.add_action(
            StateId::new(1),
            Symbol::new(4),
            ParseAction::Shift { state: StateId::new(2), extra: false, repetition: false },
        );
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(1));

        assert!(do_all_potential_reductions(&mut gss, &pool, &table, 0, Some(Symbol::new(4))));
        assert_eq!(gss.state(0), StateId::new(1));
    }

    #[test]
    fn runs_a_reduce_action_with_no_matching_shift() {
        let mut table = ToyTable::new(8, Symbol::new(0), Symbol::new(1), Symbol::new(2));
        table.add_action(
            StateId::new(1),
            Symbol::new(4),
            ParseAction::Reduce {
                symbol: Symbol::new(9),
                child_count: 1,
                dynamic_precedence: 0,
                production_id: ProductionId::new(0),
            },
        );
        table.set_transition(StateId::new(1), Symbol::new(9), StateId::new(3));
        let pool = SubtreePool::new();
        let mut gss = Gss::new(StateId::new(1));
        let child = pool.leaf(Symbol::new(1), StateId::new(1), 0, 1, 0, false);
        gss.push(0, child, false, StateId::new(1), Point::ZERO);

        assert!(!do_all_potential_reductions(&mut gss, &pool, &table, 0, Some(Symbol::new(4))));
        assert_eq!(gss.state(0), StateId::new(3));
    }
}
