mod engine;
mod tools;

use engine::core::app_setup::create_app;

fn main() {
    let app = create_app();

    #[cfg(target_arch = "wasm32")]
    {
        let mut app = app;
        wasm_bindgen_futures::spawn_local(async move {
            app.run();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let mut app = app;
        app.run();
    }
}
