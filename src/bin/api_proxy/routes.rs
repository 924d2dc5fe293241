//! Route wiring, one registrar per feature area.

use giga::middleware::{inject, logger, recovery};
use giga::Engine;

use crate::captcha::CaptchaClient;
use crate::handlers::{greet, pages, user};

/// Something that knows how to attach its routes to an engine.
pub trait Routes {
    fn route(&self, engine: &mut Engine);
}

struct PageRoutes;

impl Routes for PageRoutes {
    fn route(&self, engine: &mut Engine) {
        engine.get("/index", pages::index);
        engine.get("/assets/*filepath", pages::asset);
    }
}

struct GreetRoutes;

impl Routes for GreetRoutes {
    fn route(&self, engine: &mut Engine) {
        engine.get("/hello/:name", greet::hello_param);

        let mut v1 = engine.group("/v1");
        v1.use_handler(logger());
        v1.get("/hello", greet::hello_query);
        v1.get("/hello/:name", greet::hello_param);
    }
}

struct UserRoutes {
    captcha: CaptchaClient,
}

impl Routes for UserRoutes {
    fn route(&self, engine: &mut Engine) {
        let mut users = engine.group("/user");
        users.use_handler(inject(self.captcha.clone()));
        users.post("/register", user::register);
        users.post("/login", user::login);
    }
}

pub fn init_router(engine: &mut Engine, captcha: CaptchaClient) {
    engine.root().use_handler(recovery());

    let registrars: [&dyn Routes; 3] = [&PageRoutes, &GreetRoutes, &UserRoutes { captcha }];
    for registrar in registrars {
        registrar.route(engine);
    }
}
