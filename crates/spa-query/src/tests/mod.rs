/*! Clause evaluation over a complete program.
 *
 * Argument classification, tables and the pattern clause are tested in their own modules. These
 * tests run every clause kind through the shared dispatch against one built program.
 */

mod consistency_tests;

use spa_core::testing::{assign, call, if_else, print, read, while_loop, ProgramBuilder};
use spa_core::Pkb;

// main:
// 1  read x
// 2  while x {
// 3    y = x * 2
// 4    if y {
// 5      call helper
//      } else {
// 6      print y
//      }
//    }
// 7  z = y + 1
// helper:
// 8  w = 10
pub(crate) fn sample() -> Pkb {
    ProgramBuilder::new()
        .procedure(
            "main",
            vec![
                read("x"),
                while_loop(
                    &["x"],
                    vec![
                        assign("y", "x * 2"),
                        if_else(&["y"], vec![call("helper")], vec![print("y")]),
                    ],
                ),
                assign("z", "y + 1"),
            ],
        )
        .procedure("helper", vec![assign("w", "10")])
        .build()
        .unwrap()
}
