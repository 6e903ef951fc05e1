extern crate env_logger;
#[macro_use]
extern crate log;
extern crate rbmap;
extern crate time;

use rbmap::RBTree;
use std::collections::BTreeMap;
use std::env;

const DEFAULT_N: i32 = 1_000_000;

fn do_print_duration<F>(what: &str, mut f: F) where F: FnMut() {
    let start = time::PreciseTime::now();
    f();
    let duration = start.to(time::PreciseTime::now());
    println!("{}: operation took {}.{:03}s", what, duration.num_seconds(), duration.num_milliseconds() % 1000);
}

fn bench_rbtree(n: i32) {
    let mut t = RBTree::new();

    do_print_duration("rbtree insert", || {
        for i in (1..n).rev() {
            t.insert(i, i*2);
        }
    });
    info!("rbtree holds {} entries", t.len());

    do_print_duration("rbtree get", || {
        for i in 1..n {
            assert_eq!(t.get(&i), Some(&(i*2)));
        }
    });

    do_print_duration("rbtree iter", || {
        let mut expected = 1;
        for (k, _) in t.iter() {
            assert_eq!(*k, expected);
            expected += 1;
        }
    });

    do_print_duration("rbtree remove", || {
        for i in 1..n {
            match t.remove(&i) {
                Some(v) => assert_eq!(v, i*2),
                None => panic!("missing {}", i),
            }
        }
    });
}

fn bench_btreemap(n: i32) {
    let mut t = BTreeMap::new();

    do_print_duration("btreemap insert", || {
        for i in (1..n).rev() {
            t.insert(i, i*2);
        }
    });

    do_print_duration("btreemap get", || {
        for i in 1..n {
            assert_eq!(t.get(&i), Some(&(i*2)));
        }
    });

    do_print_duration("btreemap iter", || {
        let mut expected = 1;
        for (k, _) in t.iter() {
            assert_eq!(*k, expected);
            expected += 1;
        }
    });

    do_print_duration("btreemap remove", || {
        for i in 1..n {
            match t.remove(&i) {
                Some(v) => assert_eq!(v, i*2),
                None => panic!("missing {}", i),
            }
        }
    });
}

fn main() {
    env_logger::init();

    let n = match env::args().nth(1) {
        Some(arg) => match arg.parse() {
            Ok(n) => n,
            Err(e) => {
                error!("bad element count {:?}: {}", arg, e);
                return;
            }
        },
        None => DEFAULT_N,
    };
    info!("benchmarking with {} elements", n);

    bench_rbtree(n);
    bench_btreemap(n);
}
