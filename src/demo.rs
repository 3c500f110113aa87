//! Sample suite run by the `testease` binary.

use std::hint::black_box;

use testease::{Outcome, assert, kinds};

#[derive(Debug, Default)]
pub struct Sample;

#[testease::fixture]
impl Sample {
    #[test(name = "Example of Assert.Equal")]
    fn example(&self) -> Outcome {
        assert::equal(1, 1)
    }

    #[test(name = "Example of Assert.True")]
    fn example2() -> Outcome {
        assert::is_true(1 == black_box(1))
    }

    #[test(name = "Example of Assert.Throws", skip = false)]
    fn example3() -> Outcome {
        assert::throws(&kinds::DIVIDE_BY_ZERO, || {
            let i = black_box(0);
            let _j = 1 / i;
        })
    }
}
