use colored::*;

use crate::terminal::print;

const BANNER: &str = r#"
            ____   ____  ____   ____    _    _   _
           |  _ \ / ___|/ ___| / ___|  / \  | \ | |
           | |_) | |  _ \___ \| |     / _ \ |  \| |
           |  _ <| |_| | ___) | |___ / ___ \| |\  |
           |_| \_\\____||____/ \____/_/   \_\_| \_|
"#;

pub fn print() {
    print::print(&format!("{}", BANNER.truecolor(0, 120, 212)));
}
