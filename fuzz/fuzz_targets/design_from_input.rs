#![no_main]

use libfuzzer_sys::fuzz_target;
use pv_sizer::input::Input;
use pv_sizer::PvSystemDesign;

fuzz_target!(|input: Input| {
    let _ = PvSystemDesign::from_input(&input);
});
