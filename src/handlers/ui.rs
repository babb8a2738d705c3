use axum::{
    response::Html,
    routing::get,
    Router,
};

pub fn ui_routes() -> Router {
    Router::new()
        .route("/", get(landing_page))
        .route("/services", get(services_page))
        .route("/pricing", get(pricing_page))
        .route("/careers", get(careers_page))
}

pub async fn landing_page() -> Html<String> {
    let html = r###"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Abhaya IT Solutions - Your Trusted Technology Partner</title>
    <meta name="description" content="IT services and consulting: cybersecurity, software development, cloud solutions, digital marketing, and IT consulting.">
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        html { scroll-behavior: smooth; }
        body { font-family: 'Segoe UI', system-ui, sans-serif; color: #1a202c; line-height: 1.6; }
        header { background: #0f172a; color: white; padding: 1rem 2rem; display: flex; justify-content: space-between; align-items: center; }
        header a { color: #cbd5e1; text-decoration: none; margin-left: 1.5rem; }
        header a:hover { color: white; }
        .hero { background: linear-gradient(135deg, #0f172a 0%, #1e3a8a 100%); color: white; text-align: center; padding: 6rem 2rem; }
        .hero h1 { font-size: 2.8rem; margin-bottom: 1rem; }
        .hero p { font-size: 1.2rem; color: #cbd5e1; max-width: 640px; margin: 0 auto 2rem; }
        .cta { display: inline-block; background: #3b82f6; color: white; padding: 0.9rem 2rem; border-radius: 8px; text-decoration: none; font-weight: 600; }
        .services { max-width: 1100px; margin: 0 auto; padding: 4rem 2rem; }
        .services h2 { text-align: center; margin-bottom: 2.5rem; font-size: 2rem; }
        .grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(280px, 1fr)); gap: 1.5rem; }
        .card { border: 1px solid #e2e8f0; border-radius: 12px; padding: 1.8rem; }
        .card h3 { margin-bottom: 0.6rem; }
        .card p { color: #475569; }
        #contact { background: #f1f5f9; text-align: center; padding: 4rem 2rem; }
        footer { background: #0f172a; color: #94a3b8; text-align: center; padding: 1.5rem; }

        /* Floating chat widget */
        #chat-toggle { position: fixed; bottom: 24px; right: 24px; width: 56px; height: 56px; border-radius: 50%;
            background: #3b82f6; color: white; border: none; font-size: 1.4rem; cursor: pointer; box-shadow: 0 4px 14px rgba(0,0,0,0.25); }
        #chat-panel { position: fixed; bottom: 92px; right: 24px; width: 340px; height: 440px; background: white;
            border: 1px solid #e2e8f0; border-radius: 12px; display: none; flex-direction: column; box-shadow: 0 8px 24px rgba(0,0,0,0.2); }
        #chat-panel.open { display: flex; }
        #chat-header { background: #0f172a; color: white; padding: 0.8rem 1rem; border-radius: 12px 12px 0 0; }
        #chat-log { flex: 1; overflow-y: auto; padding: 0.8rem; font-size: 0.92rem; }
        .msg { margin-bottom: 0.6rem; padding: 0.5rem 0.8rem; border-radius: 10px; white-space: pre-wrap; }
        .msg.user { background: #dbeafe; margin-left: 2rem; }
        .msg.assistant { background: #f1f5f9; margin-right: 2rem; }
        #chat-form { display: flex; border-top: 1px solid #e2e8f0; }
        #chat-input { flex: 1; border: none; padding: 0.8rem; font-size: 0.95rem; outline: none; }
        #chat-send { border: none; background: #3b82f6; color: white; padding: 0 1.2rem; cursor: pointer; }
    </style>
</head>
<body>
    <header>
        <strong>Abhaya IT Solutions</strong>
        <nav>
            <a href="/">Home</a>
            <a href="/services">Services</a>
            <a href="/pricing">Pricing</a>
            <a href="/careers">Careers</a>
            <a href="#contact">Contact</a>
        </nav>
    </header>

    <section class="hero">
        <h1>Your Trusted Technology Partner</h1>
        <p>We help businesses achieve digital transformation through innovative IT solutions, combining technical expertise with strategic thinking to deliver measurable results.</p>
        <a class="cta" href="#contact">Schedule a Consultation</a>
    </section>

    <section class="services">
        <h2>Our Core Services</h2>
        <div class="grid">
            <div class="card"><h3>Cybersecurity Solutions</h3><p>Security audits, penetration testing, threat detection, incident response, and compliance consulting (GDPR, HIPAA, SOC2).</p></div>
            <div class="card"><h3>Software Development</h3><p>Custom web and mobile applications, enterprise software, API development and integration, legacy modernization.</p></div>
            <div class="card"><h3>Cloud Solutions</h3><p>Cloud migration and architecture across AWS, Azure, and Google Cloud, with DevOps and managed services.</p></div>
            <div class="card"><h3>Digital Marketing</h3><p>SEO and content strategy, performance marketing, brand identity, analytics and conversion optimization.</p></div>
            <div class="card"><h3>IT Consulting</h3><p>Technology strategy and roadmaps, digital transformation advisory, process automation, team augmentation.</p></div>
        </div>
    </section>

    <section id="contact">
        <h2>Let's build something together</h2>
        <p>Reach us at hello@abhayait.example or ask our assistant below.</p>
    </section>

    <footer>&copy; 2025 Abhaya IT Solutions. All rights reserved.</footer>

    <button id="chat-toggle" title="Chat with us">&#128172;</button>
    <div id="chat-panel">
        <div id="chat-header">Abhaya Assistant</div>
        <div id="chat-log"></div>
        <form id="chat-form">
            <input id="chat-input" placeholder="Ask about our services..." autocomplete="off">
            <button id="chat-send" type="submit">Send</button>
        </form>
    </div>

    <script>
        const panel = document.getElementById('chat-panel');
        const log = document.getElementById('chat-log');
        const input = document.getElementById('chat-input');
        const messages = [];
        let busy = false;

        document.getElementById('chat-toggle').onclick = () => {
            panel.classList.toggle('open');
            if (panel.classList.contains('open')) input.focus();
        };

        function addBubble(role, content) {
            const div = document.createElement('div');
            div.className = 'msg ' + role;
            div.textContent = content;
            log.appendChild(div);
            log.scrollTop = log.scrollHeight;
            return div;
        }

        document.getElementById('chat-form').onsubmit = async (e) => {
            e.preventDefault();
            const text = input.value.trim();
            if (!text || busy) return;
            busy = true;
            input.value = '';

            messages.push({ role: 'user', content: text });
            addBubble('user', text);
            const bubble = addBubble('assistant', '');

            try {
                const response = await fetch('/api/chat', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ messages })
                });
                if (!response.ok) {
                    const err = await response.json();
                    throw new Error(err.error || 'Failed to get response');
                }

                const reader = response.body.getReader();
                const decoder = new TextDecoder();
                let buffer = '';
                let reply = '';

                while (true) {
                    const { done, value } = await reader.read();
                    if (done) break;
                    buffer += decoder.decode(value, { stream: true });
                    const lines = buffer.split('\n');
                    buffer = lines.pop();
                    for (const line of lines) {
                        if (!line.startsWith('data: ')) continue;
                        const data = line.slice(6);
                        if (data === '[DONE]') continue;
                        try {
                            const parsed = JSON.parse(data);
                            if (parsed.text) {
                                reply += parsed.text;
                                bubble.textContent = reply;
                                log.scrollTop = log.scrollHeight;
                            }
                        } catch { /* skip bad lines */ }
                    }
                }
                messages.push({ role: 'assistant', content: reply });
            } catch (err) {
                bubble.textContent = 'Sorry, I encountered an error: ' + err.message;
                messages.push({ role: 'assistant', content: bubble.textContent });
            } finally {
                busy = false;
            }
        };
    </script>
</body>
</html>
"###;
    Html(html.to_string())
}

pub async fn services_page() -> Html<String> {
    let html = r###"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Services - Abhaya IT Solutions</title>
    <meta name="description" content="We offer a range of IT services including cybersecurity, software development, and digital marketing.">
    <style>
        body { font-family: 'Segoe UI', system-ui, sans-serif; color: #1a202c; max-width: 760px; margin: 0 auto; padding: 3rem 2rem; line-height: 1.7; }
        h2 { margin-top: 2rem; }
        a { color: #3b82f6; }
        ul { padding-left: 1.4rem; }
    </style>
</head>
<body>
    <h1>Our Services</h1>

    <h2>Cybersecurity Solutions</h2>
    <ul>
        <li>Security audits and penetration testing</li>
        <li>Threat detection and incident response</li>
        <li>Compliance consulting (GDPR, HIPAA, SOC2)</li>
        <li>Security awareness training</li>
    </ul>

    <h2>Software Development</h2>
    <ul>
        <li>Custom web and mobile applications</li>
        <li>Enterprise software solutions</li>
        <li>API development and integration</li>
        <li>Legacy system modernization</li>
    </ul>

    <h2>Cloud Solutions</h2>
    <ul>
        <li>Cloud migration and architecture</li>
        <li>AWS, Azure, and Google Cloud expertise</li>
        <li>DevOps and CI/CD implementation</li>
        <li>Managed cloud services</li>
    </ul>

    <h2>Digital Marketing</h2>
    <ul>
        <li>SEO and content strategy</li>
        <li>Performance marketing</li>
        <li>Brand identity and design</li>
        <li>Analytics and conversion optimization</li>
    </ul>

    <h2>IT Consulting</h2>
    <ul>
        <li>Technology strategy and roadmaps</li>
        <li>Digital transformation advisory</li>
        <li>Process automation</li>
        <li>Team augmentation</li>
    </ul>

    <p>Not sure where to start? <a href="/#contact">Contact our team</a> or ask the assistant on the <a href="/">home page</a>.</p>
</body>
</html>
"###;
    Html(html.to_string())
}

pub async fn pricing_page() -> Html<String> {
    let html = r###"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Pricing - Abhaya IT Solutions</title>
    <meta name="description" content="Get a quote for our services based on your project requirements.">
    <style>
        body { font-family: 'Segoe UI', system-ui, sans-serif; color: #1a202c; max-width: 760px; margin: 0 auto; padding: 3rem 2rem; line-height: 1.7; }
        a { color: #3b82f6; }
    </style>
</head>
<body>
    <h1>Pricing</h1>
    <p>Every engagement is different, so our pricing is customized to your project's scope, timeline, and team needs. We offer fixed-price projects, retainers, and team augmentation with flexible engagement models.</p>
    <p>Tell us what you're building and we'll put a proposal together — <a href="/#contact">contact our team</a> or ask the assistant on our <a href="/">home page</a> for a ballpark.</p>
</body>
</html>
"###;
    Html(html.to_string())
}

pub async fn careers_page() -> Html<String> {
    let html = r###"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Careers - Abhaya IT Solutions</title>
    <style>
        body { font-family: 'Segoe UI', system-ui, sans-serif; color: #1a202c; max-width: 760px; margin: 0 auto; padding: 3rem 2rem; line-height: 1.7; }
        a { color: #3b82f6; }
    </style>
</head>
<body>
    <h1>Careers</h1>
    <p>We're a team of certified professionals who care about doing right by our clients. We hire across security, software engineering, cloud, and marketing.</p>
    <p>No open positions are listed right now — but we're always happy to hear from good people. Send your CV to careers@abhayait.example.</p>
    <p><a href="/">&larr; Back home</a></p>
</body>
</html>
"###;
    Html(html.to_string())
}
