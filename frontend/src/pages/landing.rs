use yew::prelude::*;

use crate::auth::role::Role;
use crate::auth::signin::SignInForm;
use crate::components::forms::{ContactForm, NewsletterForm};
use crate::components::hero_slider::{HeroSlider, Slide};
use crate::components::modal::{ModalPanel, ModalTrigger};
use crate::components::nav::{Nav, NavLink};
use crate::components::reveal::Reveal;
use crate::config::{DASHBOARD_MODAL, SIGNIN_MODAL};

const FEATURES: &[(&str, &str, &str)] = &[
    ("users", "Student Records", "Enrollment, attendance and report cards in one place."),
    ("calendar", "Timetables", "Class schedules, exams and school events for every term."),
    ("bar-chart-2", "Grades & Progress", "Teachers post results; parents follow along in real time."),
    ("message-circle", "Messaging", "Announcements and direct messages between staff and families."),
    ("credit-card", "Fee Payments", "Invoices, receipts and payment history for each household."),
    ("shield", "Role-Based Access", "Separate dashboards for administrators, teachers, students and parents."),
];

const CONTACT_ITEMS: &[(&str, &str, &str)] = &[
    ("map-pin", "Visit Us", "12 Harbour Road, Lagos"),
    ("phone", "Call Us", "+234 800 000 0000"),
    ("mail", "Email Us", "info@schoolportal.edu"),
];

fn slides() -> Vec<Slide> {
    vec![
        Slide {
            image: "/assets/hero-1.jpg".into(),
            title: "Welcome to SchoolPortal".into(),
            subtitle: "Everything your school community needs, in one place.".into(),
        },
        Slide {
            image: "/assets/hero-2.jpg".into(),
            title: "Learning, Connected".into(),
            subtitle: "Teachers, students and parents working from the same page.".into(),
        },
        Slide {
            image: "/assets/hero-3.jpg".into(),
            title: "Run Your School with Confidence".into(),
            subtitle: "Records, results and payments without the paperwork.".into(),
        },
    ]
}

fn nav_links() -> Vec<NavLink> {
    [
        ("#home", "Home"),
        ("#about", "About"),
        ("#features", "Features"),
        ("#vision", "Vision"),
        ("#contact", "Contact"),
    ]
    .iter()
    .map(|(href, label)| NavLink {
        href: (*href).into(),
        label: (*label).into(),
    })
    .collect()
}

fn portal_description(role: Role) -> &'static str {
    match role {
        Role::Student => "Timetables, assignments and results",
        Role::Teacher => "Classes, grading and attendance",
        Role::Parent => "Progress reports and fee payments",
        Role::Admin => "School-wide records and settings",
    }
}

#[function_component(Landing)]
pub fn landing() -> Html {
    html! {
        <>
            <Nav brand="SchoolPortal" links={nav_links()}>
                <li>
                    <ModalTrigger name={DASHBOARD_MODAL} class="btn btn-outline nav-btn">
                        {"Dashboards"}
                    </ModalTrigger>
                </li>
                <li>
                    <ModalTrigger name={SIGNIN_MODAL} class="btn btn-primary nav-btn">
                        <span data-feather="log-in"></span>
                        {" Sign In"}
                    </ModalTrigger>
                </li>
            </Nav>

            <section id="home" class="hero">
                <HeroSlider slides={slides()}>
                    <div class="hero-actions">
                        <ModalTrigger name={SIGNIN_MODAL} class="btn btn-primary btn-lg">
                            {"Get Started"}
                        </ModalTrigger>
                        <a href="#about" class="btn btn-outline btn-lg">{"Learn More"}</a>
                    </div>
                </HeroSlider>
            </section>

            <section id="about" class="about">
                <div class="container about-grid">
                    <Reveal class="about-image">
                        <img src="/assets/about.jpg" alt="Students in a classroom" />
                    </Reveal>
                    <Reveal class="about-content">
                        <h2 class="section-title">{"About SchoolPortal"}</h2>
                        <p>
                            {"SchoolPortal brings administration, teaching and family communication together so \
                              that everyone works from the same up-to-date information."}
                        </p>
                        <p>
                            {"Each member of the school community signs in to a dashboard built for their role."}
                        </p>
                    </Reveal>
                </div>
            </section>

            <section id="features" class="features">
                <div class="container">
                    <h2 class="section-title">{"Features"}</h2>
                    <div class="features-grid">
                        { for FEATURES.iter().map(|(icon, title, text)| html! {
                            <Reveal class="feature-card">
                                <div class="feature-icon"><span data-feather={*icon}></span></div>
                                <h3>{ *title }</h3>
                                <p>{ *text }</p>
                            </Reveal>
                        }) }
                    </div>
                </div>
            </section>

            <section id="vision" class="vision-mission">
                <div class="container vm-grid">
                    <Reveal class="vm-card">
                        <h3>{"Our Vision"}</h3>
                        <p>{"A school where every learner, parent and teacher is connected and informed."}</p>
                    </Reveal>
                    <Reveal class="vm-card">
                        <h3>{"Our Mission"}</h3>
                        <p>{"To make school administration simple so educators can focus on teaching."}</p>
                    </Reveal>
                </div>
            </section>

            <section id="contact" class="contact">
                <div class="container contact-grid">
                    <div class="contact-info">
                        <h2 class="section-title">{"Get in Touch"}</h2>
                        { for CONTACT_ITEMS.iter().map(|(icon, title, text)| html! {
                            <Reveal class="contact-item">
                                <span data-feather={*icon}></span>
                                <div>
                                    <h4>{ *title }</h4>
                                    <p>{ *text }</p>
                                </div>
                            </Reveal>
                        }) }
                    </div>
                    <ContactForm />
                </div>
            </section>

            <footer class="footer">
                <div class="container footer-grid">
                    <div class="footer-brand">
                        <h3>{"SchoolPortal"}</h3>
                        <p>{"School management for the whole community."}</p>
                    </div>
                    <div class="footer-newsletter">
                        <h4>{"Newsletter"}</h4>
                        <p>{"Term dates and announcements, straight to your inbox."}</p>
                        <NewsletterForm />
                    </div>
                </div>
                <p class="footer-copy">{"© SchoolPortal. All rights reserved."}</p>
            </footer>

            <ModalPanel name={DASHBOARD_MODAL} title="Access Your Dashboard">
                <div class="portal-options">
                    { for Role::ALL.iter().map(|role| html! {
                        <ModalTrigger name={SIGNIN_MODAL} class="portal-option">
                            <strong>{ role.label() }</strong>
                            <span>{ portal_description(*role) }</span>
                        </ModalTrigger>
                    }) }
                </div>
            </ModalPanel>

            <ModalPanel name={SIGNIN_MODAL} title="Sign In">
                <SignInForm />
            </ModalPanel>
        </>
    }
}
