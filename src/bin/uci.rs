use corvid::attacks;
use corvid::search::Engine;
use corvid::uci;

fn main() {
    attacks::init();
    let mut engine = Engine::new();
    uci::uci_loop(&mut engine);
}
