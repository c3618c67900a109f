mod export;
mod integration;
mod util;
